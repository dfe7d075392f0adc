use comfy_table::{Color, Table};

use crate::core::{ApodDate, ApodRecord, NoImageSignal, PageOutcome};
use crate::output::format::{Palette, field_table, label_cell, value_cell};

fn row(table: &mut Table, label: &str, value: &str, color: Option<Color>, emphasized: bool) {
    table.add_row(vec![label_cell(label), value_cell(value, color, emphasized)]);
}

pub(crate) fn render_record(record: &ApodRecord, use_color: bool) -> String {
    let palette = Palette::new(use_color);
    let mut table = field_table(&record.date.to_string(), palette);
    row(&mut table, "Title", &record.title, palette.paint(Color::Yellow), true);
    row(&mut table, "Explanation", &record.explanation, None, false);
    row(&mut table, "Image", &record.compressed_image_url, palette.paint(Color::Blue), false);
    row(&mut table, "Full resolution", &record.full_res_image_url, palette.paint(Color::Blue), false);
    row(&mut table, "Page", &record.page_url, palette.paint(Color::Blue), false);
    table.to_string()
}

pub(crate) fn render_no_image(date: ApodDate, signal: &NoImageSignal, use_color: bool) -> String {
    let palette = Palette::new(use_color);
    let mut table = field_table(&date.to_string(), palette);
    if let Some(title) = &signal.title {
        row(&mut table, "Title", title, palette.paint(Color::Yellow), true);
    }
    row(
        &mut table,
        "Media",
        "APOD has uploaded a video. No image found.",
        palette.paint(Color::Magenta),
        false,
    );
    row(&mut table, "Page", &signal.page_url, palette.paint(Color::Blue), false);
    table.to_string()
}

pub(crate) fn render_outcome(date: ApodDate, outcome: &PageOutcome, use_color: bool) -> String {
    match outcome {
        PageOutcome::Image(record) => render_record(record, use_color),
        PageOutcome::NoImage(signal) => render_no_image(date, signal, use_color),
    }
}
