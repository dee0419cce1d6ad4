//! One open book project
//!
//! `Session` owns everything that belongs to the project currently being
//! edited: the canonical stylesheet text and its parsed cache, the undo
//! history, per-chapter centering, the visual form's target and fields, and
//! the chapter list. The UI holds exactly one (or none) and calls into it;
//! nothing here is global.
//!
//! Every change goes through the text: the rule cache and the form fields are
//! re-derived from it after each mutation.

use crate::compile::{pandoc, CompileJob, CompileRequest};
use crate::config::Settings;
use crate::css::overlay::{self, CenteringFlags, ChapterCentering};
use crate::css::scope::{root_selector, Scope};
use crate::css::{parse, RuleSet};
use crate::editor::{apply_fields, load_fields, Debouncer, FormFields, HistoryStack, StyleTarget};
use crate::error::{Error, Result};
use crate::preview::{self, FileLinker, PreviewPage};
use crate::project::{
    load_chapters, load_project, Chapter, ChapterEvent, ChapterWatcher, Project, ProjectLayout,
    StylesheetFile,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct Session {
    layout: ProjectLayout,
    file: StylesheetFile,
    chapters: Vec<Chapter>,

    /// Canonical stylesheet text
    stylesheet: String,
    /// Parsed from `stylesheet`, never edited directly
    rules: RuleSet,
    root_class: String,

    history: HistoryStack,
    typing: Debouncer,
    /// Bumped when the text is replaced by anything other than typing
    text_version: u64,

    centering: ChapterCentering,

    form_target: StyleTarget,
    form_scope: Scope,
    form_fields: FormFields,

    /// `None` previews every chapter
    preview_chapter: Option<usize>,
    preview_dirty: bool,
    preview_path: Option<PathBuf>,

    /// A save was refused while a compile held the stylesheet
    save_pending: bool,

    watcher: Option<ChapterWatcher>,
}

impl Session {
    // ─────────────────────────────────────────────────────────────────────────
    // Opening
    // ─────────────────────────────────────────────────────────────────────────

    /// Open the project at `root` and start watching its chapters.
    pub fn open(root: &Path, settings: &Settings) -> Result<Self> {
        let project = load_project(root)?;
        let create_stylesheet = !project.stylesheet_existed;
        let mut session = Self::from_project(project, settings);

        if create_stylesheet {
            match session.save() {
                Ok(_) => info!("Created {}", session.file.path().display()),
                Err(e) => warn!("Could not create the default stylesheet: {}", e),
            }
        }

        match ChapterWatcher::new(&session.layout.chapters_dir()) {
            Ok(watcher) => session.watcher = Some(watcher),
            Err(e) => warn!("Chapter changes will not be picked up automatically: {}", e),
        }
        Ok(session)
    }

    /// Build a session from an already loaded project (no file watcher).
    pub fn from_project(project: Project, settings: &Settings) -> Self {
        let Project {
            layout,
            stylesheet,
            chapters,
            ..
        } = project;

        let mut history = HistoryStack::new(settings.history_capacity);
        history.push(&stylesheet);

        let mut session = Self {
            file: StylesheetFile::new(layout.stylesheet_path()),
            layout,
            chapters,
            rules: RuleSet::new(),
            stylesheet,
            root_class: settings.root_class.clone(),
            history,
            typing: Debouncer::new(settings.typing_debounce()),
            text_version: 0,
            centering: ChapterCentering::new(),
            form_target: StyleTarget::default(),
            form_scope: Scope::Global,
            form_fields: FormFields::default(),
            preview_chapter: None,
            preview_dirty: true,
            preview_path: None,
            save_pending: false,
            watcher: None,
        };
        session.rederive();
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn name(&self) -> String {
        self.layout.name()
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn stylesheet(&self) -> &str {
        &self.stylesheet
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn root_class(&self) -> &str {
        &self.root_class
    }

    pub fn text_version(&self) -> u64 {
        self.text_version
    }

    pub fn can_undo(&self) -> bool {
        self.typing.is_pending() || self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.typing.is_pending() && self.history.can_redo()
    }

    pub fn save_pending(&self) -> bool {
        self.save_pending
    }

    pub fn preview_path(&self) -> Option<&Path> {
        self.preview_path.as_deref()
    }

    fn rederive(&mut self) {
        self.rules = parse(&self.stylesheet);
        self.form_fields = load_fields(
            &self.stylesheet,
            &self.root_class,
            &self.form_target,
            self.form_scope,
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Typed change in the raw editor.
    ///
    /// The text becomes canonical and is saved right away; the undo snapshot
    /// waits until typing has been idle for the debounce window.
    pub fn edit_text(&mut self, text: String, now: Instant) -> Result<()> {
        if text == self.stylesheet {
            return Ok(());
        }
        self.stylesheet = text;
        self.rederive();
        self.typing.touch(now);
        self.save().map(|_| ())
    }

    /// Commit typed text once the idle window has passed.
    ///
    /// Returns `true` if a snapshot was taken.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.typing.is_due(now) {
            self.flush_typing()
        } else {
            false
        }
    }

    /// Commit any pending typed text immediately.
    pub fn flush_typing(&mut self) -> bool {
        if !self.typing.take() {
            return false;
        }
        self.preview_dirty = true;
        self.history.push(&self.stylesheet)
    }

    /// Time until pending typed text is committed.
    pub fn typing_remaining(&self, now: Instant) -> Option<Duration> {
        self.typing.remaining(now)
    }

    pub fn set_typing_window(&mut self, window: Duration) {
        self.typing.set_window(window);
    }

    /// Replace the canonical text from a discrete action and record it.
    fn commit(&mut self, text: String) -> Result<()> {
        self.flush_typing();
        self.stylesheet = text;
        self.rederive();
        self.history.push(&self.stylesheet);
        self.text_version += 1;
        self.preview_dirty = true;
        self.save().map(|_| ())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Visual form
    // ─────────────────────────────────────────────────────────────────────────

    pub fn form_target(&self) -> &StyleTarget {
        &self.form_target
    }

    pub fn form_scope(&self) -> Scope {
        self.form_scope
    }

    pub fn form_fields(&self) -> &FormFields {
        &self.form_fields
    }

    pub fn form_fields_mut(&mut self) -> &mut FormFields {
        &mut self.form_fields
    }

    /// Point the form at another selector and load its values.
    pub fn select_form_target(&mut self, target: StyleTarget, scope: Scope) {
        let scope = match scope {
            Scope::Chapter(index) if index >= self.chapters.len() => Scope::Global,
            other => other,
        };
        self.form_target = target;
        self.form_scope = scope;
        self.reload_form();
    }

    /// Discard unapplied form edits.
    pub fn reload_form(&mut self) {
        self.form_fields = load_fields(
            &self.stylesheet,
            &self.root_class,
            &self.form_target,
            self.form_scope,
        );
    }

    /// Write the form into the stylesheet as one undo step.
    pub fn apply_form(&mut self) -> Result<()> {
        if !self.form_target.is_writable() {
            return Err(Error::InvalidSelector {
                selector: self.form_target.label().to_string(),
            });
        }
        self.flush_typing();
        let text = apply_fields(
            &self.stylesheet,
            &self.root_class,
            &self.form_target,
            self.form_scope,
            &self.form_fields,
        );
        debug!(
            "Applying form to '{}'",
            self.form_target.selector(&self.root_class, self.form_scope)
        );
        self.commit(text)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Centering
    // ─────────────────────────────────────────────────────────────────────────

    pub fn chapter_centering(&self, chapter: usize) -> CenteringFlags {
        self.centering.get(chapter)
    }

    /// Preview-only centering for one chapter. The stylesheet is not touched.
    pub fn set_chapter_centering(&mut self, chapter: usize, flags: CenteringFlags) {
        if chapter >= self.chapters.len() {
            return;
        }
        self.centering.set(chapter, flags);
        self.preview_dirty = true;
    }

    /// Append centering rules for the whole book to the stylesheet.
    ///
    /// Returns `false` (and changes nothing) when no flag is set.
    pub fn quick_center_global(&mut self, flags: CenteringFlags) -> Result<bool> {
        let fragment = overlay::generate(&flags, &root_selector(&self.root_class, Scope::Global));
        if fragment.is_empty() {
            return Ok(false);
        }
        let text = overlay::compose(&self.stylesheet, &fragment);
        self.commit(text)?;
        Ok(true)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// Step back one snapshot. Pending typed text is committed first, so the
    /// first undo after typing returns to the text before it.
    pub fn undo(&mut self) -> Result<bool> {
        self.flush_typing();
        match self.history.undo().map(str::to_string) {
            Some(snapshot) => self.restore(snapshot).map(|_| true),
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.flush_typing();
        match self.history.redo().map(str::to_string) {
            Some(snapshot) => self.restore(snapshot).map(|_| true),
            None => Ok(false),
        }
    }

    fn restore(&mut self, snapshot: String) -> Result<()> {
        self.history.begin_replay();
        self.stylesheet = snapshot;
        self.rederive();
        self.text_version += 1;
        self.preview_dirty = true;
        let saved = self.save();
        self.history.end_replay();
        saved.map(|_| ())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings that affect the session
    // ─────────────────────────────────────────────────────────────────────────

    /// Change the book root class. Existing rules are not rewritten.
    pub fn set_root_class(&mut self, root_class: &str) {
        let root_class = Settings::normalize_root_class(root_class);
        if root_class.is_empty() || root_class == self.root_class {
            return;
        }
        info!("Root class changed to '.{}'", root_class);
        self.root_class = root_class;
        self.reload_form();
        self.preview_dirty = true;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Chapters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn preview_chapter(&self) -> Option<usize> {
        self.preview_chapter
    }

    /// Restrict the preview to one chapter, or `None` for all.
    pub fn set_preview_chapter(&mut self, chapter: Option<usize>) {
        let chapter = chapter.filter(|index| *index < self.chapters.len());
        if chapter != self.preview_chapter {
            self.preview_chapter = chapter;
            self.preview_dirty = true;
        }
    }

    /// Re-read the chapter list from disk.
    ///
    /// On failure (e.g. every chapter was deleted) the old list is kept.
    pub fn reload_chapters(&mut self) -> Result<()> {
        let chapters = load_chapters(&self.layout)?;
        let count = chapters.len();
        self.chapters = chapters;

        self.centering.retain_chapters(count);
        self.preview_chapter = self.preview_chapter.filter(|index| *index < count);
        if matches!(self.form_scope, Scope::Chapter(index) if index >= count) {
            self.form_scope = Scope::Global;
            self.reload_form();
        }
        self.preview_dirty = true;
        info!("Reloaded {} chapter(s)", count);
        Ok(())
    }

    /// Apply watcher events. Returns `true` if the chapters were reloaded.
    pub fn poll_chapter_changes(&mut self) -> Result<bool> {
        let Some(watcher) = &self.watcher else {
            return Ok(false);
        };

        let mut changed = false;
        for event in watcher.poll_events() {
            match event {
                ChapterEvent::Changed(path) => {
                    debug!("Chapter changed on disk: {}", path.display());
                    changed = true;
                }
                ChapterEvent::Error(e) => warn!("Chapter watcher error: {}", e),
            }
        }

        if changed {
            self.reload_chapters()?;
        }
        Ok(changed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Write the canonical text to disk.
    ///
    /// Returns `Ok(false)` when a compile holds the file; the save is then
    /// remembered and done by [`flush_pending_save`](Self::flush_pending_save).
    /// A failed write leaves the in-memory text as it is.
    pub fn save(&mut self) -> Result<bool> {
        match self.file.try_write(&self.stylesheet) {
            Ok(()) => {
                self.save_pending = false;
                Ok(true)
            }
            Err(Error::StylesheetBusy) => {
                debug!("Stylesheet busy, deferring save");
                self.save_pending = true;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Perform a deferred save, if any.
    pub fn flush_pending_save(&mut self) -> Result<bool> {
        if !self.save_pending {
            return Ok(false);
        }
        self.save()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preview
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_preview_dirty(&self) -> bool {
        self.preview_dirty
    }

    /// Stylesheet text used for the preview: canonical text plus the
    /// per-chapter centering overlay. The canonical text is not changed.
    pub fn preview_stylesheet(&self) -> String {
        overlay::compose(&self.stylesheet, &self.centering.overlay(&self.root_class))
    }

    /// Full preview page for the current chapter selection.
    pub fn render_preview_html(&self, refresh_secs: Option<u32>) -> String {
        let chapters: Vec<(usize, &Chapter)> = match self.preview_chapter {
            Some(index) => self
                .chapters
                .get(index)
                .map(|chapter| vec![(index, chapter)])
                .unwrap_or_default(),
            None => self.chapters.iter().enumerate().collect(),
        };

        let title = self.name();
        let stylesheet = self.preview_stylesheet();
        let page = PreviewPage {
            title: &title,
            root_class: &self.root_class,
            stylesheet: &stylesheet,
            chapters,
            refresh_secs,
        };
        page.render(&FileLinker::new(self.layout.clone()))
    }

    /// Render and write the preview file. Returns its path.
    pub fn write_preview(&mut self, refresh_secs: Option<u32>) -> Result<PathBuf> {
        let path = preview::preview_path(&self.name());
        preview::write_preview(&path, &self.render_preview_html(refresh_secs))?;
        self.preview_dirty = false;
        self.preview_path = Some(path.clone());
        Ok(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compile
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot everything a compile needs. Pending typing is committed first
    /// so the EPUB matches what is on screen.
    pub fn compile_job(&mut self, settings: &Settings) -> CompileJob {
        self.flush_typing();
        let program = pandoc::resolve_compiler(settings.compiler_path.as_deref());
        let chapters = self.chapters.iter().map(|c| c.path.clone()).collect();
        CompileJob {
            file: self.file.clone(),
            canonical: self.stylesheet.clone(),
            root_class: self.root_class.clone(),
            request: CompileRequest::new(program, &self.layout, chapters, &pandoc::output_dir()),
            timeout: settings.compile_timeout(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CSS: &str = ".book-content p {\n  color: #333333;\n}\n";

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("Chapters")).unwrap();
        fs::create_dir_all(root.join("styles")).unwrap();
        fs::write(root.join("Chapters/01-one.md"), "# One\n\nFirst.").unwrap();
        fs::write(root.join("Chapters/02-two.md"), "# Two\n\nSecond.").unwrap();
        fs::write(root.join("styles/epub-styles.css"), CSS).unwrap();
        dir
    }

    fn session(dir: &TempDir) -> Session {
        let project = load_project(dir.path()).unwrap();
        Session::from_project(project, &Settings::default())
    }

    fn on_disk(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join("styles/epub-styles.css")).unwrap()
    }

    #[test]
    fn test_open_loads_everything() {
        let dir = project();
        let session = Session::open(dir.path(), &Settings::default()).unwrap();
        assert_eq!(session.chapters().len(), 2);
        assert_eq!(session.stylesheet(), CSS);
        assert!(session.rules().get(".book-content p").is_some());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_open_invalid_project() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Session::open(dir.path(), &Settings::default()),
            Err(Error::ProjectInvalid { .. })
        ));
    }

    #[test]
    fn test_typing_is_debounced_into_one_snapshot() {
        let dir = project();
        let mut session = session(&dir);
        let start = Instant::now();

        session.edit_text(format!("{}h1 {{", CSS), start).unwrap();
        session
            .edit_text(format!("{}h1 {{ color: red; }}", CSS), start + Duration::from_millis(100))
            .unwrap();
        assert!(!session.tick(start + Duration::from_millis(300)));
        assert!(session.tick(start + Duration::from_millis(700)));

        // Saved immediately, before the snapshot.
        assert!(on_disk(&dir).ends_with("h1 { color: red; }"));

        assert!(session.undo().unwrap());
        assert_eq!(session.stylesheet(), CSS);
        assert!(!session.undo().unwrap());
        assert!(session.redo().unwrap());
        assert!(session.stylesheet().ends_with("h1 { color: red; }"));
    }

    #[test]
    fn test_undo_flushes_pending_typing() {
        let dir = project();
        let mut session = session(&dir);
        session.edit_text("p { margin: 0; }".to_string(), Instant::now()).unwrap();
        assert!(session.can_undo());

        assert!(session.undo().unwrap());
        assert_eq!(session.stylesheet(), CSS);
        assert_eq!(on_disk(&dir), CSS);
        assert!(session.redo().unwrap());
        assert_eq!(session.stylesheet(), "p { margin: 0; }");
    }

    #[test]
    fn test_apply_form_commits_one_step() {
        let dir = project();
        let mut session = session(&dir);
        session.select_form_target(StyleTarget::Paragraph, Scope::Global);
        assert_eq!(session.form_fields().color, "#333333");

        session.form_fields_mut().font_size = "1.1em".to_string();
        let version = session.text_version();
        session.apply_form().unwrap();

        assert!(session.text_version() > version);
        assert_eq!(
            session.rules().get(".book-content p").unwrap().get("font-size"),
            Some("1.1em")
        );
        assert!(on_disk(&dir).contains("font-size: 1.1em;"));

        session.undo().unwrap();
        assert_eq!(session.stylesheet(), CSS);
        assert_eq!(session.form_fields().font_size, "");
    }

    #[test]
    fn test_apply_form_rejects_unusable_selector() {
        let dir = project();
        let mut session = session(&dir);
        for selector in ["", "p {"] {
            session.select_form_target(StyleTarget::Custom(selector.to_string()), Scope::Global);
            session.form_fields_mut().color = "red".to_string();
            assert!(matches!(
                session.apply_form(),
                Err(Error::InvalidSelector { .. })
            ));
        }
        assert_eq!(session.stylesheet(), CSS);
        assert_eq!(on_disk(&dir), CSS);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_form_chapter_scope() {
        let dir = project();
        let mut session = session(&dir);
        session.select_form_target(StyleTarget::Heading1, Scope::Chapter(1));
        session.form_fields_mut().text_align = "center".to_string();
        session.apply_form().unwrap();
        assert!(session
            .stylesheet()
            .contains(".book-content.chapter-2 h1 {\n  text-align: center;\n}"));

        // Out-of-range chapter falls back to global.
        session.select_form_target(StyleTarget::Heading1, Scope::Chapter(9));
        assert_eq!(session.form_scope(), Scope::Global);
    }

    #[test]
    fn test_chapter_centering_only_in_preview() {
        let dir = project();
        let mut session = session(&dir);
        session.set_chapter_centering(
            0,
            CenteringFlags {
                headings: true,
                ..CenteringFlags::default()
            },
        );

        assert_eq!(session.stylesheet(), CSS);
        assert_eq!(on_disk(&dir), CSS);
        assert!(!session.can_undo());
        assert!(session
            .preview_stylesheet()
            .contains(".book-content.chapter-1 h1"));
        assert!(session
            .render_preview_html(None)
            .contains(".book-content.chapter-1 h1"));
    }

    #[test]
    fn test_quick_center_global_is_committed() {
        let dir = project();
        let mut session = session(&dir);
        assert!(!session
            .quick_center_global(CenteringFlags::default())
            .unwrap());
        assert!(!session.can_undo());

        let flags = CenteringFlags {
            images: true,
            ..CenteringFlags::default()
        };
        assert!(session.quick_center_global(flags).unwrap());
        assert!(session
            .stylesheet()
            .contains(".book-content img { display: block; margin: 0 auto; }"));
        assert_eq!(
            session.rules().get(".book-content img").unwrap().get("display"),
            Some("block")
        );
        assert!(session.can_undo());
    }

    #[test]
    fn test_save_deferred_while_compile_holds_file() {
        let dir = project();
        let mut session = session(&dir);
        // The job's file shares the session's lock.
        let job = session.compile_job(&Settings::default());
        let guard = job.file.lock();
        session
            .edit_text("p { color: blue; }".to_string(), Instant::now())
            .unwrap();
        assert!(session.save_pending());
        assert_eq!(on_disk(&dir), CSS);
        drop(guard);

        assert!(session.flush_pending_save().unwrap());
        assert!(!session.save_pending());
        assert_eq!(on_disk(&dir), "p { color: blue; }");
    }

    #[test]
    fn test_compile_job_snapshot() {
        let dir = project();
        let mut session = session(&dir);
        session.edit_text("p { a: b; }".to_string(), Instant::now()).unwrap();

        let settings = Settings {
            compiler_path: Some("/opt/pandoc".to_string()),
            compile_timeout_secs: Some(30),
            ..Settings::default()
        };
        let job = session.compile_job(&settings);
        assert_eq!(job.canonical, "p { a: b; }");
        assert_eq!(job.root_class, "book-content");
        assert_eq!(job.request.program, "/opt/pandoc");
        assert_eq!(job.request.chapters.len(), 2);
        assert_eq!(job.timeout, Some(Duration::from_secs(30)));
        // Typing was committed.
        assert!(!session.can_redo());
        assert!(session.undo().unwrap());
    }

    #[test]
    fn test_preview_chapter_selection() {
        let dir = project();
        let mut session = session(&dir);

        let all = session.render_preview_html(None);
        assert!(all.contains("<h1>One</h1>") && all.contains("<h1>Two</h1>"));

        session.set_preview_chapter(Some(1));
        let one = session.render_preview_html(None);
        assert!(!one.contains("<h1>One</h1>"));
        assert!(one.contains("book-content chapter-2"));

        session.set_preview_chapter(Some(5));
        assert_eq!(session.preview_chapter(), None);
    }

    #[test]
    fn test_reload_chapters_trims_state() {
        let dir = project();
        let mut session = session(&dir);
        session.set_preview_chapter(Some(1));
        session.set_chapter_centering(
            1,
            CenteringFlags {
                paragraphs: true,
                ..CenteringFlags::default()
            },
        );

        fs::remove_file(dir.path().join("Chapters/02-two.md")).unwrap();
        session.reload_chapters().unwrap();

        assert_eq!(session.chapters().len(), 1);
        assert_eq!(session.preview_chapter(), None);
        assert_eq!(session.chapter_centering(1), CenteringFlags::default());
    }

    #[test]
    fn test_reload_without_chapters_keeps_old_list() {
        let dir = project();
        let mut session = session(&dir);
        fs::remove_file(dir.path().join("Chapters/01-one.md")).unwrap();
        fs::remove_file(dir.path().join("Chapters/02-two.md")).unwrap();
        assert!(session.reload_chapters().is_err());
        assert_eq!(session.chapters().len(), 2);
    }

    #[test]
    fn test_set_root_class() {
        let dir = project();
        let mut session = session(&dir);
        session.set_root_class(" .novel ");
        assert_eq!(session.root_class(), "novel");
        session.set_root_class("   ");
        assert_eq!(session.root_class(), "novel");
    }

    #[test]
    fn test_write_preview_clears_dirty() {
        let dir = project();
        let mut session = session(&dir);
        assert!(session.is_preview_dirty());
        let path = session.write_preview(Some(2)).unwrap();
        assert!(!session.is_preview_dirty());
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("http-equiv=\"refresh\""));
        let _ = fs::remove_file(path);
    }
}
