use crate::{emit_success, NoteCommand, OutputMode};
use filevault::archive;
use filevault::codec::format_timestamp;
use filevault::config::{self, VaultConfig};
use filevault::import::{collect_import_paths, ImportFile};
use filevault::media::{self, MediaKind};
use filevault::scratch::ScratchPad;
use filevault::ui::{self, human_bytes, section, success, summary_row, Icons};
use filevault::{FileRecord, FileVault};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Shown instead of text content for binary records
pub const BINARY_PLACEHOLDER: &str = "[binary file - cannot be displayed as text]";

pub struct Context {
    pub vault: FileVault,
    pub db_path: PathBuf,
    pub mode: OutputMode,
}

async fn require_record(ctx: &Context, id: i64) -> anyhow::Result<FileRecord> {
    match ctx.vault.get_by_id(id).await? {
        Some(record) => Ok(record),
        None => anyhow::bail!("No file with id {}", id),
    }
}

/// Ask for confirmation on a terminal; refuse when there is nobody to ask
fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    let term = console::Term::stderr();
    if !term.is_term() {
        anyhow::bail!("refusing to continue without a terminal (use --yes)");
    }
    term.write_str(&format!("{} [y/N] ", prompt))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn run_init(
    ctx: &Context,
    config_path: &Path,
    to_write: &VaultConfig,
    force: bool,
) -> anyhow::Result<()> {
    let store = ctx.vault.ensure_open().await?;
    let version = store.schema_version()?;
    config::write_config(config_path, to_write, force)?;

    if ctx.mode.is_human() {
        ui::header("Vault ready");
        ui::status(Icons::DATABASE, "Database", &ctx.db_path.display().to_string());
        ui::status(Icons::FILE, "Config", &config_path.display().to_string());
        summary_row("Schema version:", &version.to_string());
    } else {
        emit_success(
            ctx.mode,
            "init",
            serde_json::json!({
                "database": ctx.db_path,
                "config": config_path,
                "schema_version": version,
            }),
        )?;
    }
    Ok(())
}

pub async fn run_import(ctx: &Context, paths: &[PathBuf], recursive: bool) -> anyhow::Result<()> {
    let files = collect_import_paths(paths, recursive)?;
    if files.is_empty() {
        if ctx.mode.is_human() {
            ui::warn("Nothing to import.");
        } else {
            emit_success(ctx.mode, "import", serde_json::json!({ "imported": [] }))?;
        }
        return Ok(());
    }

    let progress = ctx.mode.is_human().then(|| ui::ImportProgress::new(files.len()));
    let mut imported = Vec::new();
    let mut total_bytes = 0u64;

    for path in &files {
        if let Some(p) = &progress {
            p.set_file(&path.display().to_string());
        }

        let file = ImportFile::read(path)?;
        let name = file.meta.name.clone();
        let size = file.data.len() as u64;
        let id = match ctx.vault.add(file.data, file.meta).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(p) = &progress {
                    p.abandon();
                }
                anyhow::bail!(
                    "import stopped at {} after {} file(s): {}",
                    path.display(),
                    imported.len(),
                    e
                );
            }
        };

        total_bytes += size;
        imported.push(serde_json::json!({ "id": id, "name": name, "size": size }));
        if let Some(p) = &progress {
            p.inc();
        }
    }

    match progress {
        Some(p) => p.finish_with_summary(imported.len(), total_bytes),
        None => emit_success(ctx.mode, "import", serde_json::json!({ "imported": imported }))?,
    }
    Ok(())
}

pub async fn run_list(ctx: &Context) -> anyhow::Result<()> {
    let records = ctx.vault.list_all().await?;

    if ctx.mode.is_human() {
        if records.is_empty() {
            println!("{} The vault is empty.", Icons::PACKAGE);
        } else {
            println!("{}", ui::records_table(&records));
        }
    } else {
        emit_success(ctx.mode, "list", &records)?;
    }
    Ok(())
}

pub async fn run_show(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let record = require_record(ctx, id).await?;

    if ctx.mode.is_human() {
        let kind = MediaKind::of(&record);
        section(&format!(" #{} {} ", record.id, record.display_name()));
        summary_row("Type:", if record.mime_type.is_empty() { "unknown" } else { &record.mime_type });
        summary_row("Size:", &human_bytes(record.size));
        summary_row("Kind:", &ui::media_label(kind));
        summary_row("Text:", if record.is_text() { "yes" } else { "no" });
        summary_row("Created:", &format_timestamp(&record.created));
    } else {
        emit_success(ctx.mode, "show", &record)?;
    }
    Ok(())
}

pub async fn run_cat(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let record = require_record(ctx, id).await?;

    if ctx.mode.is_human() {
        match &record.text_content {
            Some(text) => print!("{}", text),
            None => println!("{}", ui::muted(BINARY_PLACEHOLDER)),
        }
    } else {
        emit_success(
            ctx.mode,
            "cat",
            serde_json::json!({ "id": record.id, "text_content": record.text_content }),
        )?;
    }
    Ok(())
}

pub async fn run_preview(ctx: &Context, id: i64) -> anyhow::Result<()> {
    let record = require_record(ctx, id).await?;
    let kind = MediaKind::of(&record);

    if ctx.mode.is_human() {
        println!("{} {}", record.display_name().bold(), ui::media_label(kind));
        if kind.is_visual() {
            ui::info("Open it with", &format!("filevault export {} --out <dir>", record.id));
        } else if kind == MediaKind::Text {
            ui::info("Read it with", &format!("filevault cat {}", record.id));
        } else {
            ui::info("Preview", "not available for this type");
        }
    } else {
        emit_success(
            ctx.mode,
            "preview",
            serde_json::json!({ "id": record.id, "kind": kind, "visual": kind.is_visual() }),
        )?;
    }
    Ok(())
}

pub async fn run_export(ctx: &Context, id: i64, out: &Path, force: bool) -> anyhow::Result<()> {
    let record = require_record(ctx, id).await?;
    let path = archive::export_record(&record, out, force)?;

    if ctx.mode.is_human() {
        ui::status(Icons::DOWN, "Exported", &path.display().to_string());
    } else {
        emit_success(ctx.mode, "export", serde_json::json!({ "id": id, "path": path }))?;
    }
    Ok(())
}

pub async fn run_export_all(ctx: &Context, out: &Path) -> anyhow::Result<()> {
    let records = ctx.vault.list_all().await?;
    if records.is_empty() {
        anyhow::bail!("no files to export");
    }

    let target = out.to_path_buf();
    let count = tokio::task::spawn_blocking(move || archive::create_tar_archive(&records, &target))
        .await??;

    if ctx.mode.is_human() {
        success(&format!("Exported {} file(s) to {}", count, out.display()));
    } else {
        emit_success(
            ctx.mode,
            "export-all",
            serde_json::json!({ "count": count, "path": out }),
        )?;
    }
    Ok(())
}

pub async fn run_delete(ctx: &Context, id: i64, yes: bool) -> anyhow::Result<()> {
    if !confirm(&format!("Delete file #{}?", id), yes)? {
        ui::warn("Cancelled.");
        return Ok(());
    }

    ctx.vault.delete_by_id(id).await?;

    if ctx.mode.is_human() {
        ui::file_deleted(id);
    } else {
        emit_success(ctx.mode, "delete", serde_json::json!({ "id": id }))?;
    }
    Ok(())
}

pub async fn run_clear(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !confirm("Delete ALL files? This cannot be undone.", yes)? {
        ui::warn("Cancelled.");
        return Ok(());
    }

    ctx.vault.clear_all().await?;

    if ctx.mode.is_human() {
        success("All files were deleted.");
    } else {
        emit_success(ctx.mode, "clear", serde_json::json!({}))?;
    }
    Ok(())
}

pub async fn run_stats(ctx: &Context) -> anyhow::Result<()> {
    let stats = ctx.vault.stats().await?;

    if ctx.mode.is_human() {
        println!("{} Filevault Statistics ({})", Icons::STATS, ctx.db_path.display());
        println!("{}", ui::stats_table(&stats));
    } else {
        emit_success(ctx.mode, "stats", &stats)?;
    }
    Ok(())
}

pub fn run_youtube(ctx: &Context, url: &str) -> anyhow::Result<()> {
    let Some(video_id) = media::youtube_video_id(url) else {
        anyhow::bail!("invalid YouTube URL: {}", url);
    };
    let embed = media::youtube_embed_url(&video_id);

    if ctx.mode.is_human() {
        ui::status(Icons::PLAY, "Embed", &embed);
    } else {
        emit_success(
            ctx.mode,
            "youtube",
            serde_json::json!({ "video_id": video_id, "embed_url": embed }),
        )?;
    }
    Ok(())
}

pub async fn run_note(ctx: &Context, command: NoteCommand) -> anyhow::Result<()> {
    let pad = ScratchPad::beside_database(&ctx.db_path);

    match command {
        NoteCommand::Save { text, from } => {
            let text = match (text, from) {
                (Some(text), _) => text,
                (None, Some(id)) => {
                    let record = require_record(ctx, id).await?;
                    match record.text_content {
                        Some(text) => text,
                        None => anyhow::bail!("file #{} is binary and cannot be edited as text", id),
                    }
                }
                (None, None) => anyhow::bail!("nothing to save"),
            };
            pad.save(&text)?;
            if ctx.mode.is_human() {
                success(&format!("Saved {} to the scratch pad", human_bytes(text.len() as u64)));
            } else {
                emit_success(ctx.mode, "note", serde_json::json!({ "saved": text.len() }))?;
            }
        }
        NoteCommand::Show => {
            let text = pad.load()?;
            if ctx.mode.is_human() {
                match text {
                    Some(text) => print!("{}", text),
                    None => ui::warn("No saved text to load."),
                }
            } else {
                emit_success(ctx.mode, "note", serde_json::json!({ "text": text }))?;
            }
        }
        NoteCommand::Export { out } => {
            if !pad.export(&out)? {
                anyhow::bail!("no saved text to export");
            }
            if ctx.mode.is_human() {
                ui::status(Icons::DOWN, "Exported", &out.display().to_string());
            } else {
                emit_success(ctx.mode, "note", serde_json::json!({ "path": out }))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use filevault::FileMetadata;

    fn context(dir: &Path) -> Context {
        let db_path = dir.join("vault.db");
        Context {
            vault: FileVault::open_path(&db_path),
            db_path,
            mode: OutputMode::Json,
        }
    }

    #[tokio::test]
    async fn test_import_then_export_all() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("a.txt"), b"alpha").unwrap();
        std::fs::write(src.join("b.bin"), [0u8, 1, 2]).unwrap();

        let ctx = context(dir.path());
        run_import(&ctx, &[src.clone()], true).await.unwrap();
        assert_eq!(ctx.vault.list_all().await.unwrap().len(), 2);

        let out = dir.path().join("backup.tar");
        run_export_all(&ctx, &out).await.unwrap();
        assert!(out.exists());
    }

    #[tokio::test]
    async fn test_export_all_of_empty_vault_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let out = dir.path().join("backup.tar");
        assert!(run_export_all(&ctx, &out).await.is_err());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_missing_record_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let err = run_show(&ctx, 77).await.unwrap_err();
        assert!(err.to_string().contains("No file with id 77"));
    }

    #[tokio::test]
    async fn test_note_from_binary_record_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let id = ctx
            .vault
            .add(vec![0xff, 0xfe], FileMetadata::new("x.bin", "", 2))
            .await
            .unwrap();

        let cmd = NoteCommand::Save { text: None, from: Some(id) };
        assert!(run_note(&ctx, cmd).await.is_err());
    }

    #[tokio::test]
    async fn test_note_from_text_record() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let id = ctx
            .vault
            .add(b"draft".to_vec(), FileMetadata::new("d.txt", "text/plain", 5))
            .await
            .unwrap();

        run_note(&ctx, NoteCommand::Save { text: None, from: Some(id) }).await.unwrap();
        let pad = ScratchPad::beside_database(&ctx.db_path);
        assert_eq!(pad.load().unwrap().as_deref(), Some("draft"));
    }

    #[tokio::test]
    async fn test_delete_with_yes_skips_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let id = ctx
            .vault
            .add(b"bye".to_vec(), FileMetadata::new("bye.txt", "text/plain", 3))
            .await
            .unwrap();

        run_delete(&ctx, id, true).await.unwrap();
        assert!(ctx.vault.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_init_writes_config_after_store_opens() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        let config_path = dir.path().join("filevault.toml");
        let to_write = VaultConfig {
            database: Some(ctx.db_path.to_string_lossy().to_string()),
            max_nul_ratio: None,
        };

        run_init(&ctx, &config_path, &to_write, false).await.unwrap();
        assert!(config_path.exists());
        assert!(ctx.db_path.exists());
    }

    #[tokio::test]
    async fn test_init_leaves_no_config_when_store_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the database directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let db_path = blocker.join("vault.db");
        let ctx = Context {
            vault: FileVault::open_path(&db_path),
            db_path: db_path.clone(),
            mode: OutputMode::Json,
        };
        let config_path = dir.path().join("filevault.toml");
        let to_write = VaultConfig {
            database: Some(db_path.to_string_lossy().to_string()),
            max_nul_ratio: None,
        };

        assert!(run_init(&ctx, &config_path, &to_write, false).await.is_err());
        assert!(!config_path.exists());
    }

    #[test]
    fn test_youtube_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path());
        assert!(run_youtube(&ctx, "https://example.com").is_err());
    }
}
