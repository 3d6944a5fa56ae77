//! 飞行中 HUD 渲染器
//!
//! 显示飞行时间、当前可得分数和距离最大飞行时间的进度。
//! 爆炸时间不显示。

use crate::engine::GameEngine;
use crate::scoring::score_breakdown;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
};

/// HUD 渲染器
///
/// 布局：
/// ```text
/// | 关卡名 |
/// |   🚀  x.x   |
/// | ==== 飞行进度 ==== |
/// ```
pub struct HudRenderer;

impl HudRenderer {
    pub fn render(&self, frame: &mut Frame, area: Rect, engine: &GameEngine) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // 关卡
                Constraint::Min(5),    // 火箭
                Constraint::Length(3), // 进度条
                Constraint::Length(1), // 提示
            ])
            .split(area);

        let session = engine.session();
        let flight_time = session.flight_time();

        frame.render_widget(
            Paragraph::new(engine.current_level_title())
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            chunks[0],
        );

        let threshold = engine.config().survival_threshold;
        let potential = score_breakdown(flight_time, threshold);
        let altitude = (flight_time * 2.0) as usize;
        let mut lines: Vec<Line> = Vec::new();
        let height = usize::from(chunks[1].height.saturating_sub(3));
        for row in 0..height {
            let marker = if height - row - 1 == altitude.min(height.saturating_sub(1)) {
                "🚀"
            } else {
                " "
            };
            lines.push(Line::from(marker));
        }
        lines.push(Line::from(format!("{:.1}x", flight_time)));
        lines.push(Line::from(format!(
            "jump now for {} points{}",
            potential.total(),
            if potential.survival_bonus > 0 { " (survival bonus!)" } else { "" }
        )));
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            chunks[1],
        );

        let ratio = if session.max_flight_time > 0.0 {
            (flight_time / session.max_flight_time).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let color = if flight_time > threshold { Color::Red } else { Color::Green };
        frame.render_widget(
            Gauge::default()
                .block(Block::default().title("Flight").borders(Borders::ALL))
                .gauge_style(Style::default().fg(color))
                .ratio(ratio)
                .label(format!("{:.1} / {:.1}", flight_time, session.max_flight_time)),
            chunks[2],
        );

        frame.render_widget(
            Paragraph::new("Space to jump!").alignment(Alignment::Center),
            chunks[3],
        );
    }
}
