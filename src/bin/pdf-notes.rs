//! PDF Notes CLI tool
//!
//! A command-line tool for printing notes to PDF with a header, footer and
//! watermark.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use pdf_notes::fonts::StandardFont;
use pdf_notes::layout::PageSize;
use pdf_notes::pdf::{create_note_pdf, extract_metadata, NoteOutputOptions};
use pdf_notes::settings::{parse_angle, Settings, SettingsOverrides, DEFAULT_SETTINGS_FILE};

/// PDF Notes - Print notes to PDF with a watermark
#[derive(Parser)]
#[command(name = "pdf-notes")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Print a note using the saved settings
    pdf-notes print \"Meeting.md\"

    # Print with a one-off header and a flatter watermark
    pdf-notes print notes.txt --title \"Weekly sync\" --header \"Team notes\" --angle -30

    # Change the saved watermark
    pdf-notes settings set --watermark \"CONFIDENTIAL\" --angle -45")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a note to <title>.pdf
    Print {
        /// Note file (plain text)
        note: PathBuf,

        /// Title used for the file name (defaults to the note's file name)
        #[arg(long)]
        title: Option<String>,

        /// Directory to write the PDF to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        #[command(flatten)]
        text: TextArgs,

        /// Replace an existing PDF with the same name
        #[arg(short, long)]
        force: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show or change the saved settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings as JSON
    Show,

    /// Change settings and save them
    Set {
        #[command(flatten)]
        text: TextArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Restore the default settings
    Reset,
}

/// Text and watermark options (an empty string clears a field)
#[derive(Args)]
struct TextArgs {
    /// Header text
    #[arg(long)]
    header: Option<String>,

    /// Footer text
    #[arg(long)]
    footer: Option<String>,

    /// Watermark text
    #[arg(long)]
    watermark: Option<String>,

    /// Watermark angle in degrees (e.g., -45 for diagonal)
    #[arg(long, allow_hyphen_values = true)]
    angle: Option<String>,
}

/// Page and font options
#[derive(Args)]
struct LayoutArgs {
    /// Watermark font size in points
    #[arg(long)]
    watermark_size: Option<f32>,

    /// Header, footer and body font size in points
    #[arg(long)]
    body_size: Option<f32>,

    /// Page margin in points
    #[arg(long)]
    margin: Option<f32>,

    /// Page size: letter, a4 or legal
    #[arg(long)]
    page_size: Option<PageSize>,

    /// Font: Helvetica or Times-Roman
    #[arg(long)]
    font: Option<StandardFont>,
}

impl TextArgs {
    fn overrides(self) -> Result<SettingsOverrides> {
        let watermark_angle = self.angle.as_deref().map(parse_angle).transpose()?;
        Ok(SettingsOverrides {
            header_text: self.header,
            footer_text: self.footer,
            watermark_text: self.watermark,
            watermark_angle,
            ..Default::default()
        })
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Print { note, title, output_dir, text, force, open } => {
            cmd_print(&cli.settings, note, title, output_dir, text, force, open)
                .context("PDF creation failed")
        }
        Commands::Settings { action } => cmd_settings(&cli.settings, action),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Print a note to PDF
fn cmd_print(
    settings_path: &Path,
    note: PathBuf,
    title: Option<String>,
    output_dir: PathBuf,
    text: TextArgs,
    force: bool,
    open: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(&note)
        .with_context(|| format!("Failed to read note {}", note.display()))?;

    let title = match title {
        Some(title) => title,
        None => note
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .with_context(|| format!("Cannot derive a title from {}", note.display()))?,
    };

    let mut settings = Settings::load(settings_path)?;
    settings.apply(text.overrides()?);

    let options = NoteOutputOptions {
        output_dir,
        overwrite: force,
    };
    let path = create_note_pdf(&title, &content, &settings, &options)?;

    eprintln!("PDF saved as {}", path.display());

    if open {
        open_file(&path)?;
    }

    Ok(())
}

/// Show or change saved settings
fn cmd_settings(settings_path: &Path, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {
            let settings = Settings::load(settings_path)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::Set { text, layout } => {
            let mut settings = Settings::load(settings_path)?;
            let overrides = SettingsOverrides {
                watermark_font_size: layout.watermark_size,
                body_font_size: layout.body_size,
                margin: layout.margin,
                page_size: layout.page_size,
                font: layout.font,
                ..text.overrides()?
            };
            if overrides.is_empty() {
                anyhow::bail!("Nothing to change; pass at least one option (see --help)");
            }
            settings.apply(overrides);

            // Refuse to persist values that could not be rendered
            settings.document_config()?;
            settings.page_geometry()?;

            settings.save(settings_path)?;
            eprintln!("Settings saved to {}", settings_path.display());
        }
        SettingsAction::Reset => {
            Settings::default().save(settings_path)?;
            eprintln!("Settings reset in {}", settings_path.display());
        }
    }
    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let metadata = extract_metadata(&input)?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(producer) = metadata.producer {
        println!("Producer: {}", producer);
    }

    Ok(())
}
