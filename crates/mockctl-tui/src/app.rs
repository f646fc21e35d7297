//! Application core: event loop, screen switching and action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use mockctl_core::{ALL_GROUPS, Admin, BusMessage, Route};

use crate::action::{Action, Notification};
use crate::bridge::run_bridge;
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::overlay::{centered, render_notification};

const TOAST_TTL: Duration = Duration::from_secs(3);

pub struct App {
    admin: Admin,
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Group selector as last announced on the bus; `None` hides it.
    group_filter: Option<String>,
    /// Text of the open group prompt.
    group_prompt: Option<String>,
    /// Group of the services tab.
    group: String,
    route: Route,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge_cancel: CancellationToken,
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(admin: Admin) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&admin).into_iter().collect();
        let route = admin.navigator().current();
        let group = route.group().unwrap_or(ALL_GROUPS).to_owned();

        Self {
            active_screen: ScreenId::for_route(&route),
            admin,
            screens,
            running: true,
            help_visible: false,
            group_filter: None,
            group_prompt: None,
            group,
            route,
            action_tx,
            action_rx,
            bridge_cancel: CancellationToken::new(),
            notification: None,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        tokio::spawn(run_bridge(
            self.admin.clone(),
            self.action_tx.clone(),
            self.bridge_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!(server = %self.server_label(), "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render | Event::Resize => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge_cancel.cancel();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn active(&mut self) -> Option<&mut Box<dyn Component>> {
        self.screens.get_mut(&self.active_screen)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if let Some(prompt) = self.group_prompt.as_mut() {
            return Ok(match key.code {
                KeyCode::Esc => {
                    self.group_prompt = None;
                    None
                }
                KeyCode::Enter => {
                    let group = prompt.trim().to_owned();
                    self.group_prompt = None;
                    Some(Action::SelectGroup(group))
                }
                KeyCode::Backspace => {
                    prompt.pop();
                    None
                }
                KeyCode::Char(c) => {
                    prompt.push(c);
                    None
                }
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.screens.get(&self.active_screen).is_some_and(|s| s.captures_input()) {
            return match self.active() {
                Some(screen) => screen.handle_key_event(key),
                None => Ok(None),
            };
        }

        match key.code {
            KeyCode::Char('q') => return Ok(Some(Action::Quit)),
            KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
            KeyCode::Char(c @ '1'..='2') => {
                let digit = c.to_digit(10).and_then(|n| u8::try_from(n).ok());
                if let Some(tab) = digit.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchTab(tab)));
                }
            }
            KeyCode::Tab => return Ok(Some(Action::SwitchTab(self.active_screen.next_tab()))),
            KeyCode::Char('G') if self.group_filter.is_some() => {
                return Ok(Some(Action::OpenGroupPrompt));
            }
            _ => {}
        }

        match self.active() {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Navigate(route) => self.admin.navigator().navigate(route.clone()),
            Action::SwitchTab(tab) => {
                let route = match tab {
                    ScreenId::ServiceActions => Route::ServiceActions,
                    _ => Route::services(Some(self.group.as_str())),
                };
                self.admin.navigator().navigate(route);
            }
            Action::RouteChanged(route) => {
                let target = ScreenId::for_route(route);
                if target != self.active_screen {
                    debug!("switching screen: {} → {target}", self.active_screen);
                    self.active_screen = target;
                }
                if let Some(group) = route.group() {
                    group.clone_into(&mut self.group);
                }
                self.route = route.clone();
                self.forward(action)?;
            }

            Action::OpenGroupPrompt => {
                self.group_prompt = Some(self.group_filter.clone().unwrap_or_default());
            }
            Action::SelectGroup(group) => {
                let group = if group.is_empty() { ALL_GROUPS } else { group.as_str() };
                self.admin.bus().publish(BusMessage::ReloadPage {
                    group: group.to_owned(),
                });
            }
            Action::Bus(message) => {
                match message {
                    BusMessage::ShowGroupsFilter(filter) => self.group_filter.clone_from(filter),
                    BusMessage::ReloadPage { group } => {
                        self.group.clone_from(group);
                        self.group_filter = Some(group.clone());
                        if let Route::Services { .. } = self.route {
                            self.route = Route::services(Some(group.as_str()));
                        }
                        self.notification = Some((
                            Notification::info(format!("Group: {group}")),
                            Instant::now(),
                        ));
                    }
                }
                self.forward(action)?;
            }

            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() >= TOAST_TTL)
                {
                    self.notification = None;
                }
                self.forward(action)?;
            }

            _ => self.forward(action)?,
        }
        Ok(())
    }

    /// Hand an action to the active screen and queue its follow-up.
    fn forward(&mut self, action: &Action) -> Result<()> {
        let follow_up = match self.active() {
            Some(screen) => screen.update(action)?,
            None => None,
        };
        if let Some(next) = follow_up {
            self.action_tx.send(next)?;
        }
        Ok(())
    }

    fn server_label(&self) -> String {
        let navigator = self.admin.navigator();
        match navigator.port() {
            Some(port) => format!("{}:{port}", navigator.host()),
            None => navigator.host().to_owned(),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, tabs, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        self.render_tab_bar(frame, tabs);
        self.render_status_bar(frame, status);

        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
        if self.help_visible {
            render_help(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.active_screen.tab();
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .map(|&id| {
                let style = if id == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", id.number(), id.label()), style))
            })
            .collect();
        let selected = ScreenId::TABS.iter().position(|&s| s == active).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(selected);

        let group = self
            .group_filter
            .as_deref()
            .map(|g| format!(" group: {g} (G) "))
            .unwrap_or_default();
        let group_width = u16::try_from(group.chars().count()).unwrap_or(0);
        let [left, right] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(group_width)]).areas(area);
        frame.render_widget(tabs, left);
        frame.render_widget(
            Paragraph::new(Span::styled(group, Style::default().fg(theme::ELECTRIC_YELLOW))),
            right,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(prompt) = &self.group_prompt {
            let line = Line::from(vec![
                Span::styled(" group: ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(prompt.as_str(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc cancel  Enter apply (empty = all)", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let line = Line::from(vec![
            Span::styled(
                format!(" ● {}", self.server_label()),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            Span::styled(format!("  /{}", self.route), Style::default().fg(theme::DIM_WHITE)),
            Span::styled(" │ ? help  Tab switch  q quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 56, 20);
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(format!("  {title}"), Style::default().fg(theme::NEON_CYAN)))
    };
    let entry = |key: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(label, theme::key_hint()),
        ])
    };

    let text = vec![
        section("Lists"),
        entry("j/k ↑/↓", "Move selection"),
        entry("h/l ←/→", "Previous / next page"),
        entry("/", "Filter rows"),
        entry("s / S", "Sort by next column / reverse"),
        entry("Enter", "Edit selected row"),
        entry("n", "New service"),
        entry("g", "Regenerate service actions"),
        entry("r", "Reload"),
        Line::from(""),
        section("Forms"),
        entry("Tab", "Next field"),
        entry("Space", "Toggle flag / cycle choice"),
        entry("Ctrl+S", "Save"),
        entry("Ctrl+D", "Delete service"),
        entry("Esc", "Back"),
        Line::from(""),
        section("Global"),
        entry("1-2 Tab", "Switch tab"),
        entry("G", "Choose group"),
        entry("? / q", "Help / quit"),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}
