//! 主菜单与关卡选择渲染器

use super::centered_rect;
use crate::engine::GameEngine;
use levels::Difficulty;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use strum::IntoEnumIterator;

/// 主菜单渲染器
pub struct MenuRenderer;

impl MenuRenderer {
    /// 渲染主菜单
    pub fn render_main_menu(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let menu_area = centered_rect(area, 60, 80);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // 标题
                Constraint::Min(6),    // 菜单项
                Constraint::Length(4), // 最佳成绩
            ])
            .split(menu_area);

        let title = Paragraph::new("🚀 LUCKY JET 🚀")
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        let items = [
            ("Space", "Launch"),
            ("L", "Select level"),
            ("A", "Achievements"),
            ("H", "High scores"),
            ("S", "Statistics"),
            ("Q", "Quit"),
        ];
        let menu: Vec<ListItem> = items
            .iter()
            .map(|(key, label)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("  [{:^5}] ", key), Style::default().fg(Color::Cyan)),
                    Span::raw(*label),
                ]))
            })
            .collect();
        frame.render_widget(
            List::new(menu).block(Block::default().title("Menu").borders(Borders::ALL)),
            layout[1],
        );

        let stats = engine.stats();
        let level_title = engine
            .levels()
            .max_unlocked_level()
            .map_or("-", |level| level.title.as_str());
        let summary = Paragraph::new(vec![
            Line::from(format!(
                "Best score {}   Longest flight {:.1}",
                stats.best_score, stats.longest_flight
            )),
            Line::from(format!(
                "Next launch: {}   Achievements {}/{}",
                level_title,
                engine.achievements().unlocked_count(),
                achievements::ACHIEVEMENTS.len()
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(summary, layout[2]);
    }

    /// 渲染关卡选择
    pub fn render_level_selection(&self, frame: &mut Frame, area: Rect, engine: &GameEngine, cursor: usize) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
            .split(area);

        let progression = engine.levels();
        let tiers: Vec<Span> = Difficulty::iter()
            .map(|difficulty| {
                let total = progression
                    .catalog()
                    .iter()
                    .filter(|level| level.difficulty == difficulty)
                    .count();
                Span::styled(
                    format!(
                        " {} {}/{} ",
                        difficulty,
                        progression.unlocked_count_by_difficulty(difficulty),
                        total
                    ),
                    Style::default().fg(difficulty_color(difficulty)),
                )
            })
            .collect();
        frame.render_widget(
            Paragraph::new(Line::from(tiers))
                .alignment(Alignment::Center)
                .block(Block::default().title("Levels").borders(Borders::ALL)),
            layout[0],
        );

        let items: Vec<ListItem> = progression
            .levels()
            .into_iter()
            .enumerate()
            .map(|(i, view)| {
                let level = view.level;
                let lock = if view.unlocked { "  " } else { "🔒" };
                let mut style = Style::default().fg(difficulty_color(level.difficulty));
                if !view.unlocked {
                    style = style.fg(Color::DarkGray);
                }
                if i == cursor {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                ListItem::new(Line::from(Span::styled(
                    format!(
                        "{} {} {:<10} needs {:>3}  explodes {:.1}-{:.1}  cap {:.1}",
                        lock,
                        level.icon,
                        level.title,
                        level.required_score,
                        level.explosion_time_range.0,
                        level.explosion_time_range.1,
                        level.max_flight_time
                    ),
                    style,
                )))
            })
            .collect();
        frame.render_widget(List::new(items).block(Block::default().borders(Borders::ALL)), layout[1]);

        frame.render_widget(
            Paragraph::new("↑↓ move, Enter launch, Esc back").alignment(Alignment::Center),
            layout[2],
        );
    }
}

pub(crate) fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Cyan,
        Difficulty::Hard => Color::Yellow,
        Difficulty::Expert => Color::Magenta,
        Difficulty::Master => Color::Red,
    }
}
