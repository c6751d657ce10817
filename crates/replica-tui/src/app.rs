use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::debug;

use replica_core::document::{self, DocumentSlot};
use replica_core::{DraftBackend, DraftError, Ticket, Wizard, WizardStep};

use crate::editor::TextField;

/// Path prompt shown over the current step while importing a `.txt` file
/// into `slot`.
pub struct ImportPrompt {
    pub slot: DocumentSlot,
    pub input: String,
}

/// The interactive shell around the wizard: owns the editors, the import
/// overlay, and the channel that carries generation results back from the
/// spawned request task.
pub struct App {
    pub wizard: Wizard,
    backend: Arc<dyn DraftBackend>,
    pub petition: TextField,
    pub contestation1: TextField,
    pub contestation2: TextField,
    pub focus: TextField,
    /// Which contestation editor has focus on the contestation step (0 or 1).
    pub contestation_focus: usize,
    pub import: Option<ImportPrompt>,
    /// One-shot, non-blocking message line (validation, import, copy).
    pub notice: Option<String>,
    pub result_scroll: u16,
    gen_tx: mpsc::UnboundedSender<(Ticket, Result<String, DraftError>)>,
    gen_rx: mpsc::UnboundedReceiver<(Ticket, Result<String, DraftError>)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(backend: Arc<dyn DraftBackend>) -> Self {
        let (gen_tx, gen_rx) = mpsc::unbounded_channel();
        Self {
            wizard: Wizard::new(),
            backend,
            petition: TextField::new("Exmo. Sr. Juiz de Direito..."),
            contestation1: TextField::new("Vem o Réu, perante V. Exa., apresentar defesa..."),
            contestation2: TextField::new("(Opcional) Cole a segunda contestação aqui..."),
            focus: TextField::new(
                "Ex: Focar na refutação da prescrição intercorrente e na legitimidade ativa do Ministério Público...",
            ),
            contestation_focus: 0,
            import: None,
            notice: None,
            result_scroll: 0,
            gen_tx,
            gen_rx,
            should_quit: false,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal).await;
        ratatui::restore();
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            self.drain_generation_results();
            terminal.draw(|f| crate::ui::draw(f, self))?;
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply any finished generation attempts. The wizard drops results
    /// whose ticket is not the most recent one.
    pub fn drain_generation_results(&mut self) {
        while let Ok((ticket, outcome)) = self.gen_rx.try_recv() {
            let was_result = self.wizard.step() == WizardStep::Result;
            self.wizard.complete_generation(ticket, outcome);
            if !was_result && self.wizard.step() == WizardStep::Result {
                self.result_scroll = 0;
            }
        }
    }

    /// Push the editor buffers into the wizard's document set. Editors are
    /// the live editing surface; the wizard is the source of truth for
    /// every operation.
    fn sync_documents(&mut self) {
        let docs = self.wizard.documents_mut();
        docs.initial_petition = self.petition.text();
        docs.contestation1 = self.contestation1.text();
        docs.contestation2 = self.contestation2.text();
        let focus = self.focus.text();
        self.wizard.set_focus_area(focus);
    }

    fn editor_for(&mut self, slot: DocumentSlot) -> &mut TextField {
        match slot {
            DocumentSlot::InitialPetition => &mut self.petition,
            DocumentSlot::Contestation1 => &mut self.contestation1,
            DocumentSlot::Contestation2 => &mut self.contestation2,
        }
    }

    fn focused_contestation_slot(&self) -> DocumentSlot {
        if self.contestation_focus == 0 {
            DocumentSlot::Contestation1
        } else {
            DocumentSlot::Contestation2
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.import.is_some() {
            self.handle_import_key(key);
            return;
        }
        self.notice = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }
        // Step indicator: Alt+digit jumps to an already completed step.
        if alt {
            if let KeyCode::Char(c @ '1'..='4') = key.code {
                let target = WizardStep::ALL[c as usize - '1' as usize];
                self.sync_documents();
                self.wizard.jump_to(target);
                return;
            }
        }

        match self.wizard.step() {
            WizardStep::InitialPetition => self.handle_petition_key(key, ctrl),
            WizardStep::Contestation => self.handle_contestation_key(key, ctrl),
            WizardStep::ReviewAndGenerate => self.handle_review_key(key, ctrl),
            WizardStep::Result => self.handle_result_key(key),
        }
    }

    fn handle_petition_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl {
            match key.code {
                KeyCode::Char('n') => self.try_advance(),
                KeyCode::Char('o') => self.open_import(DocumentSlot::InitialPetition),
                _ => {}
            }
            return;
        }
        self.petition.input(key);
    }

    fn handle_contestation_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl {
            match key.code {
                KeyCode::Char('n') => self.try_advance(),
                KeyCode::Char('b') => self.go_back(),
                KeyCode::Char('o') => self.open_import(self.focused_contestation_slot()),
                _ => {}
            }
            return;
        }
        if key.code == KeyCode::Tab {
            self.contestation_focus = 1 - self.contestation_focus;
            return;
        }
        let slot = self.focused_contestation_slot();
        self.editor_for(slot).input(key);
    }

    fn handle_review_key(&mut self, key: KeyEvent, ctrl: bool) {
        if ctrl {
            match key.code {
                KeyCode::Char('g') => self.start_generation(),
                KeyCode::Char('b') => self.go_back(),
                _ => {}
            }
            return;
        }
        self.focus.input(key);
    }

    fn handle_result_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => self.wizard.redo(),
            KeyCode::Char('c') => self.copy_result(),
            KeyCode::Up => self.result_scroll = self.result_scroll.saturating_sub(1),
            KeyCode::Down => self.result_scroll = self.result_scroll.saturating_add(1),
            KeyCode::PageUp => self.result_scroll = self.result_scroll.saturating_sub(10),
            KeyCode::PageDown => self.result_scroll = self.result_scroll.saturating_add(10),
            KeyCode::Home => self.result_scroll = 0,
            _ => {}
        }
    }

    pub fn try_advance(&mut self) {
        self.sync_documents();
        if let Err(e) = self.wizard.advance() {
            self.notice = Some(e.to_string());
        }
    }

    fn go_back(&mut self) {
        self.sync_documents();
        self.wizard.back();
    }

    /// Kick off one generation attempt on a spawned task. The wizard
    /// refuses while a request is outstanding, so mashing the key is
    /// harmless.
    pub fn start_generation(&mut self) {
        self.sync_documents();
        match self.wizard.begin_generation() {
            Ok((ticket, request)) => {
                let backend = Arc::clone(&self.backend);
                let tx = self.gen_tx.clone();
                tokio::spawn(async move {
                    let outcome = backend.draft(&request).await;
                    let _ = tx.send((ticket, outcome));
                });
            }
            Err(e) => debug!("generate refused: {e}"),
        }
    }

    fn open_import(&mut self, slot: DocumentSlot) {
        self.import = Some(ImportPrompt {
            slot,
            input: String::new(),
        });
    }

    fn handle_import_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.import = None,
            KeyCode::Enter => {
                if let Some(prompt) = self.import.take() {
                    self.apply_import(&prompt);
                }
            }
            KeyCode::Backspace => {
                if let Some(p) = self.import.as_mut() {
                    p.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(p) = self.import.as_mut() {
                    p.input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Replace the target buffer with the file's contents. Failures leave
    /// the buffer untouched and surface only as a notice line.
    fn apply_import(&mut self, prompt: &ImportPrompt) {
        match document::import_txt(Path::new(prompt.input.trim())) {
            Ok(text) => {
                self.editor_for(prompt.slot).set_text(&text);
                self.wizard.documents_mut().set(prompt.slot, text);
                self.notice = Some(format!("Arquivo importado: {}.", prompt.slot.label()));
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Best-effort OSC 52 clipboard write. The copied notice appears only
    /// when the escape sequence was actually written out; a failed write
    /// stays silent.
    fn copy_result(&mut self) {
        let Some(text) = self.wizard.result().map(str::to_owned) else {
            return;
        };
        let written = crossterm::execute!(
            std::io::stderr(),
            crossterm::clipboard::CopyToClipboard::to_clipboard_from(text.as_bytes())
        )
        .and_then(|()| std::io::stderr().flush())
        .is_ok();
        if written {
            self.notice = Some("Texto copiado para a área de transferência!".into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use replica_core::DraftRequest;

    struct CannedBackend(String);

    #[async_trait]
    impl DraftBackend for CannedBackend {
        async fn draft(&self, _request: &DraftRequest) -> Result<String, DraftError> {
            Ok(self.0.clone())
        }
    }

    fn app() -> App {
        App::new(Arc::new(CannedBackend("# Minuta".into())))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn alt(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::ALT)
    }

    fn fill_to_review(app: &mut App) {
        for c in "Peticao X".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(ctrl('n'));
        app.handle_key(key(KeyCode::Char('D')));
        app.handle_key(ctrl('n'));
        assert_eq!(app.wizard.step(), WizardStep::ReviewAndGenerate);
    }

    #[test]
    fn advancing_with_empty_petition_shows_validation_notice() {
        let mut app = app();
        app.handle_key(ctrl('n'));
        assert_eq!(app.wizard.step(), WizardStep::InitialPetition);
        assert_eq!(
            app.notice.as_deref(),
            Some("Por favor, insira o texto da Petição Inicial.")
        );
    }

    #[test]
    fn typed_text_reaches_the_wizard_on_advance() {
        let mut app = app();
        for c in "Peticao X".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(ctrl('n'));
        assert_eq!(app.wizard.step(), WizardStep::Contestation);
        assert_eq!(app.wizard.documents().initial_petition, "Peticao X");
    }

    #[test]
    fn failed_import_leaves_buffer_unchanged() {
        let mut app = app();
        for c in "texto digitado".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(ctrl('o'));
        for c in "/caminho/inexistente.txt".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.petition.text(), "texto digitado");
        assert!(app.notice.is_some());
    }

    #[test]
    fn import_overlay_escape_cancels() {
        let mut app = app();
        app.handle_key(ctrl('o'));
        assert!(app.import.is_some());
        app.handle_key(key(KeyCode::Esc));
        assert!(app.import.is_none());
    }

    #[test]
    fn alt_jumps_apply_only_to_earlier_steps() {
        let mut app = app();
        fill_to_review(&mut app);

        app.handle_key(alt('4'));
        assert_eq!(app.wizard.step(), WizardStep::ReviewAndGenerate);
        app.handle_key(alt('3'));
        assert_eq!(app.wizard.step(), WizardStep::ReviewAndGenerate);

        app.handle_key(alt('1'));
        assert_eq!(app.wizard.step(), WizardStep::InitialPetition);
    }

    #[tokio::test]
    async fn copy_notice_appears_after_the_clipboard_write() {
        let mut app = app();
        fill_to_review(&mut app);
        app.start_generation();
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.drain_generation_results();
        assert_eq!(app.wizard.step(), WizardStep::Result);

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(
            app.notice.as_deref(),
            Some("Texto copiado para a área de transferência!")
        );
    }

    #[tokio::test]
    async fn generation_result_is_applied_from_the_channel() {
        let mut app = app();
        fill_to_review(&mut app);

        app.start_generation();
        assert!(app.wizard.is_generating());

        // Let the spawned draft task run to completion.
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.drain_generation_results();

        assert_eq!(app.wizard.step(), WizardStep::Result);
        assert_eq!(app.wizard.result(), Some("# Minuta"));
    }
}
