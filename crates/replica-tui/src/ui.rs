use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

use replica_core::{GenerationStatus, WizardStep};

use crate::app::App;
use crate::editor::TextField;

const ACCENT: Color = Color::Cyan;
const DIM: Style = Style::new().fg(Color::DarkGray);

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_indicator(f, chunks[1], app);
    match app.wizard.step() {
        WizardStep::InitialPetition => draw_petition(f, chunks[2], app),
        WizardStep::Contestation => draw_contestations(f, chunks[2], app),
        WizardStep::ReviewAndGenerate => draw_review(f, chunks[2], app),
        WizardStep::Result => draw_result(f, chunks[2], app),
    }
    draw_footer(f, chunks[3], app);

    if app.import.is_some() {
        draw_import_overlay(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            "JuridicoAI",
            Style::new().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Assistente de Impugnação", DIM)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_indicator(f: &mut Frame, area: Rect, app: &App) {
    let current = app.wizard.step();
    let mut spans: Vec<Span> = Vec::new();
    for (i, step) in WizardStep::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ›  ", DIM));
        }
        let text = format!("{}. {}", i + 1, step.label());
        let style = if *step == current {
            Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else if step.ordinal() < current.ordinal() {
            Style::new().fg(Color::Green)
        } else {
            DIM
        };
        spans.push(Span::styled(text, style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn editor_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Style::new().fg(ACCENT) } else { DIM };
    Block::bordered().title(title).border_style(border)
}

fn draw_editor(f: &mut Frame, area: Rect, field: &mut TextField, title: String, focused: bool) {
    let block = editor_block(title, focused);
    let height = area.height.saturating_sub(2) as usize;
    let text = field.visible_text(height, focused);
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_petition(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);
    let desc = Paragraph::new(Span::styled(
        "Cole aqui o texto da sua Petição Inicial (Exordial). A IA usará este texto para aprender seus fundamentos e estilo de escrita.",
        DIM,
    ))
    .wrap(Wrap { trim: true });
    f.render_widget(desc, chunks[0]);
    let title = format!(
        "1. Petição Inicial — {} caracteres",
        app.petition.char_count()
    );
    draw_editor(f, chunks[1], &mut app.petition, title, true);
}

fn draw_contestations(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let title1 = format!(
        "2.1 Contestação (Réu 1) — {} caracteres",
        app.contestation1.char_count()
    );
    let title2 = format!(
        "2.2 Contestação (Réu 2) — Opcional — {} caracteres",
        app.contestation2.char_count()
    );
    let focus = app.contestation_focus;
    draw_editor(f, chunks[0], &mut app.contestation1, title1, focus == 0);
    draw_editor(f, chunks[1], &mut app.contestation2, title2, focus == 1);
}

fn draw_review(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(area);

    let mut summary = vec![
        Line::from(Span::styled(
            "Resumo dos Dados",
            Style::new().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "Petição Inicial: {} caracteres",
            app.petition.char_count()
        )),
        Line::from(format!(
            "Contestação 1: {} caracteres",
            app.contestation1.char_count()
        )),
    ];
    if app.contestation2.is_empty() {
        summary.push(Line::from(Span::styled("2º Réu não informado", DIM)));
    } else {
        summary.push(Line::from(format!(
            "Contestação 2: {} caracteres",
            app.contestation2.char_count()
        )));
    }
    f.render_widget(Paragraph::new(summary), chunks[0]);

    draw_editor(
        f,
        chunks[1],
        &mut app.focus,
        "Instruções de Foco (Opcional)".to_string(),
        true,
    );

    let status_line = match app.wizard.status() {
        GenerationStatus::InProgress => Line::from(Span::styled(
            "Analisando Juridicamente...",
            Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        GenerationStatus::Failed(msg) => {
            Line::from(Span::styled(msg.clone(), Style::new().fg(Color::Red)))
        }
        GenerationStatus::Idle => Line::from(Span::styled(
            "Pronto para gerar. Ctrl+G inicia a análise.",
            DIM,
        )),
    };
    f.render_widget(Paragraph::new(status_line), chunks[2]);
}

fn draw_result(f: &mut Frame, area: Rect, app: &App) {
    let text = app.wizard.result().unwrap_or_default();
    let block = Block::bordered()
        .title("Minuta Sugerida")
        .border_style(Style::new().fg(ACCENT));
    let paragraph = Paragraph::new(markdown_lines(text))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(notice.clone(), Style::new().fg(Color::Yellow)))
    } else {
        let help = match app.wizard.step() {
            WizardStep::InitialPetition => {
                "Ctrl+N Próximo · Ctrl+O Importar .txt · Ctrl+Q Sair"
            }
            WizardStep::Contestation => {
                "Tab Alternar réu · Ctrl+N Próximo · Ctrl+B Voltar · Ctrl+O Importar .txt · Ctrl+Q Sair"
            }
            WizardStep::ReviewAndGenerate => {
                "Ctrl+G Gerar Impugnação · Ctrl+B Voltar · Alt+1..2 Ir para etapa · Ctrl+Q Sair"
            }
            WizardStep::Result => "r Refazer · c Copiar Texto · ↑/↓ Rolar · Ctrl+Q Sair",
        };
        Line::from(Span::styled(help, DIM))
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_import_overlay(f: &mut Frame, app: &App) {
    let Some(prompt) = &app.import else { return };
    let area = centered_rect(f.area(), 60, 5);
    f.render_widget(Clear, area);
    let block = Block::bordered()
        .title(format!("Importar .txt — {}", prompt.slot.label()))
        .border_style(Style::new().fg(ACCENT));
    let lines = vec![
        Line::from(format!("{}_", prompt.input)),
        Line::from(Span::styled("Enter Importar · Esc Cancelar", DIM)),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(base: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(base.width);
    let h = height.min(base.height);
    Rect {
        x: base.x + (base.width - w) / 2,
        y: base.y + (base.height - h) / 2,
        width: w,
        height: h,
    }
}

/// Light Markdown styling for the generated draft: top-level headers in the
/// accent color, subheaders bold, everything else verbatim.
pub(crate) fn markdown_lines(text: &str) -> Vec<Line<'static>> {
    text.lines()
        .map(|l| {
            if let Some(rest) = l.strip_prefix("# ") {
                Line::from(Span::styled(
                    rest.to_string(),
                    Style::new().fg(ACCENT).add_modifier(Modifier::BOLD),
                ))
            } else if let Some(rest) = l.strip_prefix("## ") {
                Line::from(Span::styled(
                    rest.to_string(),
                    Style::new().add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(l.to_string())
            }
        })
        .collect()
}
