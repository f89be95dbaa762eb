use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use happy8_core::compound::CompoundScore;
use happy8_core::models::{Draw, NumberSet, ScoreResult, ScoredPrediction};
use happy8_core::paytable::Paytable;
use happy8_core::source::CsvImport;
use happy8_core::summary::HistorySummary;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numéros trouvés entre crochets.
pub fn format_hits(numbers: &[u8], draw: &Draw) -> String {
    numbers
        .iter()
        .map(|&n| {
            if draw.contains(n) {
                format!("[{:02}]", n)
            } else {
                format!("{:02}", n)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_prize(prize: f64) -> String {
    if prize > 0.0 {
        format!("{:.2} ¥", prize)
    } else {
        "—".to_string()
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Tirage", "Date", "Numéros 1-10", "Numéros 11-20"]);
    for draw in draws {
        let (first, second) = draw.winning_numbers().split_at(10);
        table.add_row(vec![
            draw.issue().to_string(),
            draw.date().to_string(),
            format_numbers(first),
            format_numbers(second),
        ]);
    }
    println!("{table}");
}

pub fn display_number_sets(sets: &[NumberSet], reference: &Draw) {
    println!(
        "\n🎲 Grilles ({} numéros), référence : tirage {}\n",
        sets.first().map_or(0, |s| s.pick_size()),
        reference.issue()
    );

    let mut table = new_table(vec!["#", "Pour le tirage", "Numéros", "Gagnants repris"]);
    for (i, set) in sets.iter().enumerate() {
        let target = set
            .source_issue()
            .map_or_else(|| "—".to_string(), |issue| issue.to_string());
        table.add_row(vec![
            format!("{}", i + 1),
            target,
            format_hits(set.numbers(), reference),
            set.hits(reference).to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_score(set: &NumberSet, draw: &Draw, result: &ScoreResult) {
    println!("\nTirage {} du {}", draw.issue(), draw.date());
    println!("  Grille  : {}", format_hits(set.numbers(), draw));
    println!("  Trouvés : {}/{}", result.hit_count, set.pick_size());
    println!("  Gain    : {}", format_prize(result.prize));
}

pub fn display_compound(set: &NumberSet, draw: &Draw, score: &CompoundScore) {
    println!("\nTirage {} du {}", draw.issue(), draw.date());
    println!("  Grille  : {}", format_hits(set.numbers(), draw));
    println!(
        "  Multiple choix {} : {} tickets, mise {:.2} ¥",
        score.play, score.tickets, score.stake
    );
    println!("  Trouvés : {}/{}", score.hit_count, score.pick);

    let mut table = new_table(vec!["Trouvés", "Tickets"]);
    for (hits, count) in &score.breakdown {
        table.add_row(vec![format!("{hits}/{}", score.play), count.to_string()]);
    }
    println!("{table}");

    let color = if score.net() >= 0.0 { Color::Green } else { Color::Red };
    let mut totals = Table::new();
    totals.load_preset(UTF8_FULL).add_row(vec![
        Cell::new("Gain total"),
        Cell::new(format_prize(score.prize)),
        Cell::new(format!("net {:+.2} ¥", score.net())).fg(color),
    ]);
    println!("{totals}");
}

pub fn display_history(rows: &[ScoredPrediction], play: Option<usize>) {
    let title = match play {
        Some(play) => format!("Historique (multiple choix {play})"),
        None => "Historique".to_string(),
    };
    println!("\n📜 {title}\n");

    let mut table = new_table(vec!["Tirage", "Grille", "Trouvés", "Gain"]);
    for row in rows {
        let color = if row.result.prize > 0.0 { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(row.issue.to_string()),
            Cell::new(format_numbers(row.set.numbers())),
            Cell::new(format!("{}/{}", row.result.hit_count, row.set.pick_size())),
            Cell::new(format_prize(row.result.prize)).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_summary(summary: &HistorySummary) {
    println!("  Tirages     : {}", summary.draws);
    println!("  Gagnants    : {} ({:.1} %)", summary.wins, summary.win_rate);
    println!("  Gains cumulés : {:.2} ¥", summary.total_prize);
    println!("  Meilleur    : {} trouvés", summary.best_hit);
}

pub fn display_paytable(paytable: &Paytable) {
    println!("\n💰 Barème des gains (mise {:.0} ¥)\n", happy8_core::paytable::UNIT_STAKE);

    let mut table = new_table(vec!["Jeu", "Trouvés", "Gain"]);
    for pick in paytable.picks() {
        for (hits, prize) in paytable.tiers_for(pick) {
            table.add_row(vec![
                format!("Choix {pick}"),
                format!("{hits}/{pick}"),
                format!("{:.2} ¥", prize),
            ]);
        }
    }
    println!("{table}");
}

pub fn display_import_summary(result: &CsvImport) {
    println!("Lecture terminée :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Tirages valides   : {}", result.draws.len());
    println!("  Doublons ignorés  : {}", result.duplicates);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use happy8_core::source::fixture_draws;

    #[test]
    fn test_format_numbers() {
        assert_eq!(format_numbers(&[3, 7, 80]), "03 07 80");
        assert_eq!(format_numbers(&[]), "");
    }

    #[test]
    fn test_format_hits() {
        let draw = &fixture_draws()[0];
        assert_eq!(format_hits(&[1, 3, 7], draw), "01 [03] [07]");
    }

    #[test]
    fn test_format_prize() {
        assert_eq!(format_prize(0.0), "—");
        assert_eq!(format_prize(720.0), "720.00 ¥");
    }
}
