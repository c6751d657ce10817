use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Text};

/// Minimal multi-line text field: a line buffer plus a cursor, rendered as
/// a plain paragraph. Covers typing, pasting line by line, and arrow
/// navigation; anything fancier belongs to an external editor and the
/// import action.
pub struct TextField {
    lines: Vec<String>,
    /// (row, column) with column counted in characters.
    cursor: (usize, usize),
    /// First visible row, kept in range by `visible_text`.
    scroll: usize,
    placeholder: &'static str,
}

impl TextField {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: (0, 0),
            scroll: 0,
            placeholder,
        }
    }

    /// The buffer joined with newlines, exactly as typed or imported.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace the whole buffer (import overwrites, never appends).
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let row = self.lines.len() - 1;
        let col = self.lines[row].chars().count();
        self.cursor = (row, col);
    }

    pub fn char_count(&self) -> usize {
        let chars: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        chars + self.lines.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    fn clamp_col(&mut self) {
        let max = self.lines[self.cursor.0].chars().count();
        if self.cursor.1 > max {
            self.cursor.1 = max;
        }
    }

    /// Apply one key event to the buffer. Unhandled keys are ignored.
    pub fn input(&mut self, key: KeyEvent) {
        let (row, col) = self.cursor;
        match key.code {
            KeyCode::Char(c) => {
                let at = Self::byte_index(&self.lines[row], col);
                self.lines[row].insert(at, c);
                self.cursor.1 += 1;
            }
            KeyCode::Enter => {
                let at = Self::byte_index(&self.lines[row], col);
                let rest = self.lines[row].split_off(at);
                self.lines.insert(row + 1, rest);
                self.cursor = (row + 1, 0);
            }
            KeyCode::Backspace => {
                if col > 0 {
                    let at = Self::byte_index(&self.lines[row], col - 1);
                    self.lines[row].remove(at);
                    self.cursor.1 -= 1;
                } else if row > 0 {
                    let removed = self.lines.remove(row);
                    let prev_len = self.lines[row - 1].chars().count();
                    self.lines[row - 1].push_str(&removed);
                    self.cursor = (row - 1, prev_len);
                }
            }
            KeyCode::Delete => {
                let line_len = self.lines[row].chars().count();
                if col < line_len {
                    let at = Self::byte_index(&self.lines[row], col);
                    self.lines[row].remove(at);
                } else if row + 1 < self.lines.len() {
                    let next = self.lines.remove(row + 1);
                    self.lines[row].push_str(&next);
                }
            }
            KeyCode::Left => {
                if col > 0 {
                    self.cursor.1 -= 1;
                } else if row > 0 {
                    self.cursor = (row - 1, self.lines[row - 1].chars().count());
                }
            }
            KeyCode::Right => {
                if col < self.lines[row].chars().count() {
                    self.cursor.1 += 1;
                } else if row + 1 < self.lines.len() {
                    self.cursor = (row + 1, 0);
                }
            }
            KeyCode::Up => {
                if row > 0 {
                    self.cursor.0 -= 1;
                    self.clamp_col();
                }
            }
            KeyCode::Down => {
                if row + 1 < self.lines.len() {
                    self.cursor.0 += 1;
                    self.clamp_col();
                }
            }
            KeyCode::Home => self.cursor.1 = 0,
            KeyCode::End => self.cursor.1 = self.lines[row].chars().count(),
            KeyCode::PageUp => {
                self.cursor.0 = self.cursor.0.saturating_sub(10);
                self.clamp_col();
            }
            KeyCode::PageDown => {
                self.cursor.0 = (self.cursor.0 + 10).min(self.lines.len() - 1);
                self.clamp_col();
            }
            _ => {}
        }
    }

    /// Text to render inside a viewport of `height` rows, scrolled so the
    /// cursor row stays visible. Shows the placeholder while empty.
    pub fn visible_text(&mut self, height: usize, focused: bool) -> Text<'static> {
        if self.is_empty() && self.lines.len() == 1 {
            return Text::styled(
                self.placeholder.to_string(),
                ratatui::style::Style::new().fg(ratatui::style::Color::DarkGray),
            );
        }
        if height > 0 {
            if self.cursor.0 < self.scroll {
                self.scroll = self.cursor.0;
            } else if self.cursor.0 >= self.scroll + height {
                self.scroll = self.cursor.0 + 1 - height;
            }
        }
        let mut lines: Vec<Line<'static>> = Vec::new();
        for (i, l) in self.lines.iter().enumerate().skip(self.scroll).take(height.max(1)) {
            if focused && i == self.cursor.0 {
                // Mark the cursor position with a reversed cell.
                let at = Self::byte_index(l, self.cursor.1);
                let (before, after) = l.split_at(at);
                let mut chars = after.chars();
                let under = chars.next().map(|c| c.to_string()).unwrap_or_else(|| " ".into());
                let rest: String = chars.collect();
                lines.push(Line::from(vec![
                    ratatui::text::Span::raw(before.to_string()),
                    ratatui::text::Span::styled(
                        under,
                        ratatui::style::Style::new().add_modifier(ratatui::style::Modifier::REVERSED),
                    ),
                    ratatui::text::Span::raw(rest),
                ]));
            } else {
                lines.push(Line::from(l.clone()));
            }
        }
        Text::from(lines)
    }
}
