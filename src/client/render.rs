use crate::prediction::{CsvRowResult, Prediction, TextPrediction};

pub fn prediction(prediction: &Prediction) -> String {
    format!(
        "Emotion: {}\nScore: {}",
        prediction.emotion, prediction.score
    )
}

pub fn text_predictions(rows: &[TextPrediction]) -> String {
    let body = rows
        .iter()
        .map(|row| {
            vec![
                row.text.clone(),
                row.emotion.clone(),
                row.score.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    table(&["text", "emotion", "score"], &body)
}

/// CSV results may mix predictions and row errors; the error column is only
/// shown when at least one row failed.
pub fn csv_results(rows: &[CsvRowResult]) -> String {
    let has_errors = rows
        .iter()
        .any(|row| matches!(row, CsvRowResult::Failed { .. }));

    let body = rows
        .iter()
        .map(|row| {
            let mut cells = match row {
                CsvRowResult::Prediction(p) => {
                    vec![p.text.clone(), p.emotion.clone(), p.score.to_string()]
                }
                CsvRowResult::Failed { text, .. } => vec![text.clone(), String::new(), String::new()],
            };
            if has_errors {
                cells.push(match row {
                    CsvRowResult::Failed { error, .. } => error.clone(),
                    CsvRowResult::Prediction(_) => String::new(),
                });
            }
            cells
        })
        .collect::<Vec<_>>();

    if has_errors {
        table(&["text", "emotion", "score", "error"], &body)
    } else {
        table(&["text", "emotion", "score"], &body)
    }
}

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let index_width = rows.len().saturating_sub(1).to_string().len();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(line(
        &" ".repeat(index_width),
        headers.iter().copied(),
        &widths,
    ));
    for (i, row) in rows.iter().enumerate() {
        lines.push(line(
            &format!("{:<index_width$}", i),
            row.iter().map(String::as_str),
            &widths,
        ));
    }

    lines.join("\n")
}

fn line<'a>(index: &str, cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut out = index.to_string();
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str("  ");
        out.push_str(cell);
        out.push_str(&" ".repeat(pad));
    }
    out.trim_end().to_string()
}
