//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use pyfreeze_types::{
    BuildReport, ColorChoice, DryRunReport, FinalizeReport, InstallReport, StageTiming,
};
use serde::Serialize;
use std::io;
use std::path::Path;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Environment provisioned and requirements installed
    Install(InstallReport),
    /// Executable built and working tree cleaned
    Build(BuildReport),
    /// Packager command that a build would run
    DryRun(DryRunReport),
    /// Leftovers removed after an interrupted build
    Clean(FinalizeReport),
}

impl OperationResult {
    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, color_choice: ColorChoice) -> Self {
        Self {
            json_output,
            color_choice,
            term: Term::stdout(),
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_table(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as formatted table
    fn render_table(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Install(report) => self.render_install_report(report),
            OperationResult::Build(report) => self.render_build_report(report),
            OperationResult::DryRun(report) => self.render_dry_run(report),
            OperationResult::Clean(report) => self.render_clean_report(report),
        }
    }

    fn render_install_report(&self, report: &InstallReport) -> io::Result<()> {
        println!("{}", self.style_heading("Install Summary"));
        println!();
        println!("Environment:  {}", report.environment.display());
        println!("Requirements: {}", report.requirements.display());
        if !report.extra_packages.is_empty() {
            println!("Extras:       {}", report.extra_packages.join(", "));
        }
        println!("Duration:     {}ms", report.duration_ms);
        Ok(())
    }

    fn render_build_report(&self, report: &BuildReport) -> io::Result<()> {
        println!("{}", self.style_heading("Build Summary"));
        println!();
        println!("Project:  {}", report.project);
        println!("Output:   {}", report.artifact_path.display());
        println!(
            "Layout:   {}",
            if report.single_file {
                "single file"
            } else {
                "directory"
            }
        );
        println!("Session:  {}", report.session_id);
        println!();
        println!("{}", self.stage_table(&report.stages));
        println!("Completed in {}ms", report.duration_ms);
        Ok(())
    }

    fn render_dry_run(&self, report: &DryRunReport) -> io::Result<()> {
        println!(
            "Would build {} with:",
            self.style_heading(&report.project)
        );
        println!();
        println!("  {}", report.program);
        for arg in &report.args {
            println!("    {arg}");
        }
        Ok(())
    }

    fn render_clean_report(&self, report: &FinalizeReport) -> io::Result<()> {
        if report.moved.is_empty() && report.removed.is_empty() {
            println!("Nothing to clean.");
            return Ok(());
        }

        let mut table = self.new_table();
        table.set_header(vec![
            Cell::new("Action").add_attribute(Attribute::Bold),
            Cell::new("Path").add_attribute(Attribute::Bold),
        ]);
        for path in &report.moved {
            table.add_row(vec![self.action_cell("moved", Color::Green), path_cell(path)]);
        }
        for path in &report.removed {
            table.add_row(vec![
                self.action_cell("removed", Color::Yellow),
                path_cell(path),
            ]);
        }

        println!("{table}");
        Ok(())
    }

    fn stage_table(&self, stages: &[StageTiming]) -> Table {
        let mut table = self.new_table();
        table.set_header(vec![
            Cell::new("Stage").add_attribute(Attribute::Bold),
            Cell::new("Duration").add_attribute(Attribute::Bold),
        ]);
        for timing in stages {
            table.add_row(vec![
                Cell::new(timing.stage),
                Cell::new(format!("{}ms", timing.duration_ms)),
            ]);
        }
        table
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        if !self.supports_color() {
            table.force_no_tty();
        }
        table
    }

    fn action_cell(&self, text: &str, color: Color) -> Cell {
        if self.supports_color() {
            Cell::new(text).fg(color)
        } else {
            Cell::new(text)
        }
    }

    fn style_heading(&self, text: &str) -> String {
        if self.supports_color() {
            Style::new().bold().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if color output is supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

fn path_cell(path: &Path) -> Cell {
    Cell::new(path.display())
}
