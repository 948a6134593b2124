use egui::{Grid, RichText, ScrollArea, Ui};
use xf_views::ListFrame;

use crate::theme::accent_color;
use crate::widget_utils::{ScrollAreaExt, WidgetId};

const COLUMNS: [&str; 5] = ["Time", "GSR", "Steps", "Calories", "Heart rate"];

/// Scrollable list of the newest matching records, one grid per day.
/// Rows that just entered the list are highlighted.
pub fn record_list_ui(ui: &mut Ui, list: &ListFrame) {
    ScrollArea::vertical()
        .id_builder(WidgetId::new("record_list"))
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if list.groups.is_empty() {
                ui.label(RichText::new("No matching records").italics());
                return;
            }

            for day in &list.groups {
                ui.add_space(6.0);
                ui.label(RichText::new(&day.label).strong());
                Grid::new(WidgetId::list_day(day.day).build())
                    .num_columns(COLUMNS.len())
                    .striped(true)
                    .min_col_width(80.0)
                    .show(ui, |ui| {
                        for column in COLUMNS {
                            ui.label(RichText::new(column).small());
                        }
                        ui.end_row();

                        let text_color = ui.visuals().text_color();
                        for row in &day.rows {
                            let color = if list.patch.inserted.contains(&row.index) {
                                accent_color()
                            } else {
                                text_color
                            };
                            for cell in [&row.time, &row.gsr, &row.steps, &row.calories, &row.heart_rate] {
                                ui.label(RichText::new(cell.as_str()).color(color));
                            }
                            ui.end_row();
                        }
                    });
            }
        });
}
