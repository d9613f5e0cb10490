//! "Leave the game?" confirmation shown over the session screen

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};

use super::modal_overlay;
use crate::theme::styles;

const MODAL_WIDTH: u16 = 46;
const MODAL_HEIGHT: u16 = 8;

pub struct ConfirmExitDialog<'a> {
    game_name: &'a str,
}

impl<'a> ConfirmExitDialog<'a> {
    pub fn new(game_name: &'a str) -> Self {
        Self { game_name }
    }
}

impl Widget for ConfirmExitDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        modal_overlay::dim_background(buf, area);

        let modal = modal_overlay::centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        Clear.render(modal, buf);
        modal_overlay::render_shadow(buf, modal);

        let block = styles::modal_block(" Leave game? ").title_alignment(Alignment::Center);
        let inner = block.inner(modal);
        block.render(modal, buf);

        let [_, question, note, _, buttons] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        Paragraph::new(format!("Stop playing {}?", self.game_name))
            .alignment(Alignment::Center)
            .style(styles::status_yellow())
            .render(question, buf);

        Paragraph::new("The streaming session will be ended.")
            .alignment(Alignment::Center)
            .style(styles::text_primary())
            .render(note, buf);

        let line = Line::from(vec![
            Span::styled("[", styles::text_muted()),
            Span::styled("y", styles::status_green()),
            Span::styled("] Leave  ", styles::text_muted()),
            Span::styled("[", styles::text_muted()),
            Span::styled("n", styles::status_red()),
            Span::styled("] Stay", styles::text_muted()),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(buttons, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_dialog_renders_question_and_buttons() {
        let mut term = TestTerminal::new();

        term.render_widget(ConfirmExitDialog::new("Racer"), term.area());

        assert!(term.buffer_contains("Leave game?"));
        assert!(term.buffer_contains("Stop playing Racer?"));
        assert!(term.buffer_contains("[y] Leave"));
        assert!(term.buffer_contains("[n] Stay"));
    }

    #[test]
    fn test_dialog_fits_compact_terminal() {
        let mut term = TestTerminal::compact();

        term.render_widget(ConfirmExitDialog::new("Racer"), term.area());

        assert!(term.buffer_contains("Leave game?"));
    }
}
