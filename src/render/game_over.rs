//! 游戏结束界面渲染器
//!
//! 显示回合结果；成功且进入前十时提示保存成绩，并绘制名字输入框。

use super::centered_rect;
use crate::engine::GameEngine;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// 游戏结束界面渲染器
pub struct GameOverRenderer;

impl GameOverRenderer {
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        engine: &GameEngine,
        score_saved: bool,
        name_input: Option<&str>,
    ) {
        let Some(outcome) = engine.last_outcome() else {
            return;
        };

        let (emoji, title, color) = if outcome.success {
            ("🪂", "SAFE LANDING", Color::Green)
        } else if outcome.jumped {
            ("🔥", "TOO LATE", Color::Yellow)
        } else {
            ("💥", "EXPLODED", Color::Red)
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // 标题
                Constraint::Min(6),    // 结果
                Constraint::Length(2), // 操作提示
            ])
            .split(centered_rect(area, 60, 80));

        frame.render_widget(
            Paragraph::new(format!("{} {} {}", emoji, title, emoji))
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        let mut lines = vec![
            Line::from(format!("Level: {}", outcome.level_title)),
            Line::from(format!("Flight time: {:.1}", outcome.flight_time)),
            Line::from(format!("Explosion at: {:.1}", outcome.explosion_time)),
            Line::from(format!("Score: {}", outcome.score)),
        ];
        if outcome.new_best {
            lines.push(Line::from("New best score!").style(Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().title("Round").borders(Borders::ALL)),
            layout[1],
        );

        let can_save = !score_saved && engine.qualifies_for_leaderboard();
        let hint = if can_save {
            "Space play again, N save top 10 score, M menu"
        } else {
            "Space play again, M menu"
        };
        frame.render_widget(Paragraph::new(hint).alignment(Alignment::Center), layout[2]);

        if let Some(name) = name_input {
            self.render_name_prompt(frame, area, name);
        }
    }

    fn render_name_prompt(&self, frame: &mut Frame, area: Rect, name: &str) {
        let popup = centered_rect(area, 40, 20);
        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(format!("{}_", name)),
                Line::from("Enter save, Esc cancel").style(Style::default().fg(Color::DarkGray)),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().title("Your name").borders(Borders::ALL)),
            popup,
        );
    }
}
