//! 覆盖层：成就、排行榜、统计

use super::centered_rect;
use crate::engine::GameEngine;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use std::time::UNIX_EPOCH;

pub struct PanelRenderer;

impl PanelRenderer {
    pub fn render_achievements(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let achievements = engine.achievements();
        let popup = centered_rect(area, 80, 90);
        let items: Vec<ListItem> = achievements
            .achievements()
            .into_iter()
            .map(|view| {
                let style = if view.unlocked {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let icon = if view.unlocked { view.icon } else { "🔒" };
                ListItem::new(Line::from(format!("{} {:<18} {}", icon, view.title, view.description)))
                    .style(style)
            })
            .collect();

        let title = format!(
            "Achievements {}/{} ({:.0}%)",
            achievements.unlocked_count(),
            achievements::ACHIEVEMENTS.len(),
            achievements.unlock_percentage() * 100.0
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(List::new(items).block(Block::default().title(title).borders(Borders::ALL)), popup);
    }

    pub fn render_leaderboard(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let popup = centered_rect(area, 70, 70);
        let board = engine.leaderboard();
        let items: Vec<ListItem> = if board.is_empty() {
            vec![ListItem::new("No scores yet")]
        } else {
            board
                .entries()
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let day = entry
                        .timestamp
                        .duration_since(UNIX_EPOCH)
                        .map_or(0, |d| d.as_secs() / 86_400);
                    ListItem::new(format!(
                        "{:>2}. {:<20} {:>4}  {:.1}  {:<10} day {}",
                        i + 1,
                        entry.player_name,
                        entry.score,
                        entry.flight_time,
                        entry.level_title,
                        day
                    ))
                })
                .collect()
        };
        frame.render_widget(Clear, popup);
        frame.render_widget(
            List::new(items).block(Block::default().title("Top 10").borders(Borders::ALL)),
            popup,
        );
    }

    pub fn render_statistics(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let popup = centered_rect(area, 60, 80);
        let stats = engine.stats();
        let rows = [
            ("Games", stats.total_games.to_string()),
            ("Jumps", stats.total_jumps.to_string()),
            ("Successful jumps", stats.total_successful_jumps.to_string()),
            ("Explosions", stats.total_explosions.to_string()),
            ("Best score", stats.best_score.to_string()),
            ("Longest flight", format!("{:.1}", stats.longest_flight)),
            ("Last-second jumps", stats.last_second_jumps.to_string()),
            ("Early jumps", stats.early_jumps.to_string()),
            ("Late jumps", stats.late_jumps.to_string()),
            ("Success streak", engine.achievements().streaks().consecutive_successful_jumps.to_string()),
            ("Levels unlocked", engine.levels().unlocked_count().to_string()),
        ];
        let mut lines: Vec<Line> = rows
            .iter()
            .map(|(label, value)| Line::from(format!("{:<20}{:>8}", label, value)))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from("R reset statistics, Esc close").style(Style::default().fg(Color::DarkGray)));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(Block::default().title("Statistics").borders(Borders::ALL)),
            popup,
        );
    }
}
