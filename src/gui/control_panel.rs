//! Control Panel Widget
//! Left side panel with the year slider and country multi-select.

use crate::data::Selection;
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;

/// Left side control panel collecting the user's selection.
pub struct ControlPanel {
    pub year: i32,
    pub year_range: Option<(i32, i32)>,
    pub countries: Vec<String>,
    pub selected: BTreeSet<String>,
    pub search: String,
    pub status: String,
}

impl ControlPanel {
    /// Slider starts at the earliest year, no country selected.
    pub fn new(year_range: Option<(i32, i32)>, countries: Vec<String>) -> Self {
        Self {
            year: year_range.map(|(min, _)| min).unwrap_or_default(),
            year_range,
            countries,
            selected: BTreeSet::new(),
            search: String::new(),
            status: "Ready".to_string(),
        }
    }

    /// Current selection for the filter.
    pub fn selection(&self) -> Selection {
        Selection::new(self.year, self.selected.iter().cloned())
    }

    /// Toggle one country; returns true if the selection changed.
    pub fn toggle_country(&mut self, country: &str, selected: bool) -> bool {
        if selected {
            self.selected.insert(country.to_string())
        } else {
            self.selected.remove(country)
        }
    }

    /// Countries matching the search box (case-insensitive).
    pub fn visible_countries(&self) -> Vec<&str> {
        let needle = self.search.trim().to_lowercase();
        self.countries
            .iter()
            .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌍 Gapminder")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new(
                    "Unlocking Lifetimes: Visualizing Progress in Longevity and Poverty Eradication",
                )
                .size(11.0)
                .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Year Section =====
        ui.label(RichText::new("📅 Select a year").size(14.0).strong());
        ui.add_space(5.0);

        match self.year_range {
            Some((min, max)) => {
                let slider = egui::Slider::new(&mut self.year, min..=max).integer();
                if ui.add(slider).changed() {
                    action = ControlPanelAction::SelectionChanged;
                }
            }
            None => {
                ui.label(RichText::new("No years available").color(Color32::GRAY));
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Country Section =====
        ui.label(RichText::new("🏳 Select countries").size(14.0).strong());
        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.label("Search:");
            ui.text_edit_singleline(&mut self.search);
        });
        ui.add_space(5.0);

        let visible: Vec<String> = self
            .visible_countries()
            .into_iter()
            .map(str::to_string)
            .collect();

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
                    for country in &visible {
                        let mut checked = self.selected.contains(country);
                        if ui.checkbox(&mut checked, country.as_str()).changed()
                            && self.toggle_country(country, checked)
                        {
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("{} selected", self.selected.len()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            if ui.small_button("Clear All").clicked() && !self.selected.is_empty() {
                self.selected.clear();
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export PNG").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportPng;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    ExportPng,
}
