//! 模块化渲染系统
//!
//! 每个界面一个渲染器：
//! - `menu` - 主菜单与关卡选择
//! - `hud` - 飞行中的计时与得分
//! - `game_over` - 结算界面与排行榜名字输入
//! - `panels` - 成就、排行榜、统计覆盖层
//!
//! 渲染器只读引擎状态，不做任何状态迁移。

pub mod game_over;
pub mod hud;
pub mod menu;
pub mod panels;

pub use game_over::GameOverRenderer;
pub use hud::HudRenderer;
pub use menu::MenuRenderer;
pub use panels::PanelRenderer;

use crate::app::App;
use crate::engine::GameEngine;
use crate::input::Overlay;
use crate::session::GameState;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

/// 绘制一帧
pub fn draw(frame: &mut Frame, app: &App, engine: &GameEngine) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(10), Constraint::Length(3)])
        .split(frame.area());

    match engine.state() {
        GameState::Menu => MenuRenderer.render_main_menu(frame, chunks[0], engine),
        GameState::LevelSelection => {
            MenuRenderer.render_level_selection(frame, chunks[0], engine, app.level_cursor)
        }
        GameState::Playing => HudRenderer.render(frame, chunks[0], engine),
        GameState::GameOver => {
            GameOverRenderer.render(frame, chunks[0], engine, app.score_saved, app.name_input.as_deref())
        }
    }

    match app.overlay {
        Overlay::None => {}
        Overlay::Achievements => PanelRenderer.render_achievements(frame, chunks[0], engine),
        Overlay::Leaderboard => PanelRenderer.render_leaderboard(frame, chunks[0], engine),
        Overlay::Statistics => PanelRenderer.render_statistics(frame, chunks[0], engine),
    }

    render_status_bar(frame, chunks[1], app);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut text: Vec<String> = app.toasts().map(str::to_string).collect();
    if let Some(message) = &app.message {
        text.push(message.clone());
    }
    let line = Line::from(text.join("  |  "));
    let bar = Paragraph::new(line)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(bar, area);
}

pub(crate) fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::rng::RoundRng;
    use crate::ticker::shared;
    use levels::all_levels;
    use ratatui::{Terminal, backend::TestBackend};
    use save::MemoryStore;

    fn screen_text(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let engine = app.engine();
                draw(frame, app, &engine);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app() -> App {
        App::new(shared(GameEngine::with_catalog(
            GameConfig::default(),
            Box::new(MemoryStore::new()),
            RoundRng::new(5),
            all_levels(),
        )))
    }

    #[test]
    fn menu_shows_title() {
        let app = app();
        assert!(screen_text(&app).contains("LUCKY JET"));
    }

    #[test]
    fn level_selection_lists_levels() {
        let mut app = app();
        app.handle(crate::input::Action::OpenLevels);
        let text = screen_text(&app);
        assert!(text.contains("Easy 1"));
        assert!(text.contains("Master 3"));
    }

    #[test]
    fn leaderboard_overlay_when_empty() {
        let mut app = app();
        app.handle(crate::input::Action::ShowLeaderboard);
        assert!(screen_text(&app).contains("No scores yet"));
    }
}
