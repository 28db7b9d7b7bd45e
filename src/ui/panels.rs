use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::state_color;
use crate::data::error::LoadError;
use crate::data::loader::load_file;
use crate::data::model::State;
use crate::state::AppState;
use crate::views::{export_json, Dashboard};

// ---------------------------------------------------------------------------
// Left side panel – year range filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    if let Some(notice) = state.filter_notice() {
        ui.label(notice);
        return;
    }
    let Some(bounds) = state.year_bounds() else {
        return;
    };

    let mut start = state.selection.start;
    let mut end = state.selection.end;

    ui.label("Selecione o ano Inicial");
    if ui
        .add(egui::Slider::new(&mut start, bounds.start..=bounds.end))
        .changed()
    {
        state.set_start_year(start);
    }

    ui.add_space(6.0);
    ui.label("Selecione o ano Final");
    if ui
        .add(egui::Slider::new(&mut end, bounds.start..=bounds.end))
        .changed()
    {
        state.set_end_year(end);
    }

    if state.selection.is_inverted() {
        ui.add_space(6.0);
        ui.label(
            RichText::new("Ano inicial maior que o final: nenhum registro selecionado.")
                .color(Color32::YELLOW),
        );
    }

    ui.add_space(12.0);
    ui.separator();
    ui.strong("Estados");
    for s in State::ALL {
        ui.label(RichText::new(s.display_name()).color(state_color(s)));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let ready = matches!(state.dashboard(), Dashboard::Ready(_));
            if ui
                .add_enabled(ready, egui::Button::new("Exportar visualizações (JSON)…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(name)) = (&state.dataset, &state.source_name) {
            let visible = match state.dashboard() {
                Dashboard::Ready(views) => views.visible_records,
                Dashboard::AwaitingInput { .. } => 0,
            };
            ui.label(format!(
                "{name}: {} registros carregados, {visible} no período {}",
                ds.len(),
                state.selection
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Carregue o arquivo desejado")
        .add_filter("Arquivos suportados", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_path(state, &path);
    }
}

/// Load `path` into the state. On failure the previous dataset is kept
/// and the error is shown in the top bar.
pub fn load_path(state: &mut AppState, path: &Path) {
    match load_file(path).with_context(|| format!("loading {}", path.display())) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} records from {} (years {})",
                dataset.len(),
                path.display(),
                dataset
                    .year_range()
                    .map_or_else(|| "none".to_string(), |r| r.to_string())
            );
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            state.set_dataset(dataset, name);
        }
        Err(e) => {
            let invalid = e
                .downcast_ref::<LoadError>()
                .is_some_and(LoadError::is_parse_error);
            let kind = if invalid {
                "Arquivo inválido"
            } else {
                "Falha ao ler arquivo"
            };
            log::error!("{e:#}");
            state.set_load_error(format!("{kind}: {e:#}"));
        }
    }
}

fn export_dialog(state: &mut AppState) {
    let file_name = state
        .export_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut dialog = rfd::FileDialog::new()
        .set_title("Exportar visualizações")
        .add_filter("JSON", &["json"])
        .set_file_name(file_name);
    if let Some(dir) = state.export_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        dialog = dialog.set_directory(dir);
    }

    if let Some(path) = dialog.save_file() {
        match export_to(state.dashboard(), &path) {
            Ok(()) => {
                log::info!("Exported views to {}", path.display());
                state.status_message = None;
                state.export_path = path;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Erro: {e:#}"));
            }
        }
    }
}

fn export_to(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    export_json(dashboard, &mut writer).context("writing JSON")?;
    writer.flush().context("flushing JSON")?;
    Ok(())
}
