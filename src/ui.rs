use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::dex::PokedexEntry;
use crate::set::{CompetitiveSet, MoveLine};
use crate::state::{AppState, Profile, View};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
const ACCENT_RED: Color = Color::Rgb(226, 98, 98);

const BADGE_EARNED: &str = "\u{25c6}";
const BADGE_EMPTY: &str = "\u{25c7}";
const SHINY_MARK: &str = "\u{2605}";

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DexComponentId {
    Profile,
    DexList,
    Search,
    Login,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DexContext {
    Profile,
    DexList,
    Search,
    Login,
}

impl EventRoutingState<DexComponentId, DexContext> for AppState {
    fn focused(&self) -> Option<DexComponentId> {
        if let Some(modal) = self.modal() {
            return Some(modal);
        }
        match self.view {
            View::Profile => Some(DexComponentId::Profile),
            View::Pokedex => Some(DexComponentId::DexList),
        }
    }

    fn modal(&self) -> Option<DexComponentId> {
        if self.login.active {
            Some(DexComponentId::Login)
        } else if self.search_active {
            Some(DexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: DexComponentId) -> DexContext {
        match id {
            DexComponentId::Profile => DexContext::Profile,
            DexComponentId::DexList => DexContext::DexList,
            DexComponentId::Search => DexContext::Search,
            DexComponentId::Login => DexContext::Login,
        }
    }

    fn default_context(&self) -> DexContext {
        DexContext::Profile
    }
}

/// Screen regions of the last draw, for event routing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiAreas {
    pub body: Rect,
    pub list: Option<Rect>,
    pub modal: Option<Rect>,
}

pub struct DexUi {
    dex_list: SelectList,
    status_bar: StatusBar,
}

impl Default for DexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl DexUi {
    pub fn new() -> Self {
        Self {
            dex_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<DexComponentId>,
    ) {
        let areas = self.draw(frame, area, state);
        for id in [
            DexComponentId::Profile,
            DexComponentId::DexList,
            DexComponentId::Search,
            DexComponentId::Login,
        ] {
            event_ctx.component_areas.remove(&id);
        }
        match state.view {
            View::Profile => event_ctx.set_component_area(DexComponentId::Profile, areas.body),
            View::Pokedex => event_ctx
                .set_component_area(DexComponentId::DexList, areas.list.unwrap_or(areas.body)),
        }
        if let Some(modal) = areas.modal {
            let id = if state.login.active {
                DexComponentId::Login
            } else {
                DexComponentId::Search
            };
            event_ctx.set_component_area(id, modal);
        }
    }

    /// Draw the whole screen and report where things landed.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> UiAreas {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(area);

        render_header(frame, layout[0], state);
        let mut areas = UiAreas {
            body: layout[1],
            ..Default::default()
        };
        match state.view {
            View::Profile => render_profile(frame, layout[1], state),
            View::Pokedex => {
                let (list, filter_bar) = render_pokedex(frame, layout[1], state, &mut self.dex_list);
                areas.list = list;
                if state.search_active {
                    areas.modal = Some(filter_bar);
                }
            }
        }
        render_footer(frame, layout[2], state, &mut self.status_bar);

        if state.login.active {
            areas.modal = Some(render_login(frame, area, state));
        }
        areas
    }

    pub fn handle_list_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        handle_list_event(event, state, &mut self.dex_list)
    }
}

pub fn handle_global_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    use crossterm::event::KeyCode;

    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        // Modals own every key while open.
        EventKind::Key(_) if state.login.active || state.search_active => HandlerResponse::ignored(),
        EventKind::Key(key) => match key.code {
            KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            KeyCode::Tab | KeyCode::BackTab => HandlerResponse::action(Action::ViewNext),
            KeyCode::Char('1') => HandlerResponse::action(Action::ViewSet(View::Profile)),
            KeyCode::Char('2') => HandlerResponse::action(Action::ViewSet(View::Pokedex)),
            KeyCode::Char('r') => HandlerResponse::action(Action::Refresh),
            KeyCode::Char('L') => HandlerResponse::action(Action::LoginStart),
            KeyCode::Char('X') => HandlerResponse::action(Action::Logout),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    }
}

pub fn handle_profile_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Enter => vec![Action::ViewSet(View::Pokedex)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_list_event(
    event: &EventKind,
    state: &AppState,
    dex_list: &mut SelectList,
) -> HandlerResponse<Action> {
    use crossterm::event::KeyCode;

    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::PageDown => vec![Action::SelectionPage(1)],
            KeyCode::PageUp => vec![Action::SelectionPage(-1)],
            KeyCode::Char('g') | KeyCode::Home => vec![Action::SelectionJumpTop],
            KeyCode::Char('G') | KeyCode::End => vec![Action::SelectionJumpBottom],
            KeyCode::Char('/') => vec![Action::SearchStart],
            KeyCode::Char('c') => vec![Action::ToggleCaughtOnly],
            KeyCode::Char('s') => vec![Action::ToggleShinyOnly],
            KeyCode::Char(']') => vec![Action::TypeFilterNext],
            KeyCode::Char('[') => vec![Action::TypeFilterPrev],
            KeyCode::Char('t') => vec![Action::TypeFilterClear],
            KeyCode::Char('x') => vec![Action::FilterReset],
            KeyCode::Enter | KeyCode::Char(' ') => vec![Action::SetPanelToggle],
            _ => {
                let items = dex_items(state);
                let props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: state.selected_index.min(items.len().saturating_sub(1)),
                    is_focused: true,
                    style: dex_list_style(),
                    behavior: SelectListBehavior {
                        show_scrollbar: true,
                        wrap_navigation: false,
                    },
                    on_select: Action::DexSelect,
                    render_item: &|item| item.clone(),
                };
                let actions: Vec<_> = dex_list.handle_event(event, props).into_iter().collect();
                return handler_response(actions);
            }
        },
        EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
            crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
            crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
            crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_login_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Esc => vec![Action::LoginCancel],
            crossterm::event::KeyCode::Enter => vec![Action::LoginSubmit],
            crossterm::event::KeyCode::Backspace => vec![Action::LoginBackspace],
            crossterm::event::KeyCode::Char(ch) => vec![Action::LoginInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let title_style = Style::default()
        .fg(ACCENT_TEAL)
        .add_modifier(Modifier::BOLD);
    let mut tabs = vec![Span::styled("TRAINERDEX", title_style), Span::raw("  ")];
    for view in [View::Profile, View::Pokedex] {
        let style = if view == state.view {
            Style::default()
                .bg(BG_HIGHLIGHT)
                .fg(TEXT_MAIN)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        tabs.push(Span::styled(format!(" {} ", view.label()), style));
        tabs.push(Span::raw(" "));
    }

    let trainer = match (state.profile.data(), state.session.trainer_id()) {
        (Some(profile), _) => profile.name.clone(),
        (None, Some(id)) => format!("id {id}"),
        (None, None) => "not logged in".to_string(),
    };
    let mut second = vec![
        Span::raw("Trainer: "),
        Span::styled(trainer, Style::default().fg(ACCENT_GOLD)),
    ];
    if state.is_loading() {
        second.push(Span::styled("  (syncing)", Style::default().fg(TEXT_DIM)));
    }
    if state.dex.is_loaded() {
        let counts = state.counts();
        second.extend([
            Span::raw("  |  Caught: "),
            Span::styled(
                format!("{}/{}", counts.caught, counts.total),
                Style::default().fg(ACCENT_TEAL),
            ),
            Span::raw("  Shiny: "),
            Span::styled(counts.shiny.to_string(), Style::default().fg(ACCENT_GOLD)),
        ]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let paragraph = Paragraph::new(Text::from(vec![Line::from(tabs), Line::from(second)]))
        .block(block)
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn render_profile(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("TRAINER")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_TEAL));

    let text = if let Some(profile) = state.profile.data() {
        profile_text(profile)
    } else if state.profile.is_loading() {
        Text::from(Line::styled("Loading trainer...", Style::default().fg(TEXT_DIM)))
    } else if let Some(error) = state.profile.error() {
        Text::from(Line::styled(error.to_string(), Style::default().fg(ACCENT_RED)))
    } else {
        Text::from(Line::styled(
            "Not logged in. Press L to log in.",
            Style::default().fg(TEXT_DIM),
        ))
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

pub fn profile_text(profile: &Profile) -> Text<'static> {
    let label = Style::default().fg(ACCENT_TEAL);
    let mut lines = vec![
        Line::styled(
            format!("Trainer {}", profile.name),
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
    ];
    if !profile.sprite.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Sprite: ", label),
            Span::raw(profile.sprite.clone()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Poke Dollar: ", label),
        Span::raw(profile.money_display()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Delay: ", label),
        Span::raw(format!("{} days", profile.delay)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Encounters: ", label),
        Span::raw(format!(
            "{} ({} new)",
            profile.encounters, profile.new_encounters
        )),
    ]));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Badges: ", label),
        Span::styled(badge_strip(profile), Style::default().fg(ACCENT_GOLD)),
    ]));
    Text::from(lines)
}

pub fn badge_strip(profile: &Profile) -> String {
    profile
        .badge_slots()
        .into_iter()
        .map(|earned| if earned { BADGE_EARNED } else { BADGE_EMPTY })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the list area (when a list is drawn) and the filter bar area.
fn render_pokedex(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    dex_list: &mut SelectList,
) -> (Option<Rect>, Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);
    render_filter_bar(frame, layout[0], state);

    let status = if state.dex.is_loading() {
        Some(("Loading Pok\u{e9}dex...".to_string(), TEXT_DIM))
    } else if let Some(error) = state.dex.error() {
        Some((error.to_string(), ACCENT_RED))
    } else if !state.dex.is_loaded() {
        Some(("No Pok\u{e9}dex loaded.".to_string(), TEXT_DIM))
    } else if state.visible.is_empty() {
        Some(("No entries match the current filters.".to_string(), TEXT_DIM))
    } else {
        None
    };
    if let Some((message, color)) = status {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("DEX")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
        let paragraph = Paragraph::new(Line::styled(message, Style::default().fg(color)))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, layout[1]);
        return (None, layout[0]);
    }

    let (list_area, set_area) = if state.show_set {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[1]);
        (split[0], Some(split[1]))
    } else {
        (layout[1], None)
    };

    render_list(frame, list_area, state, dex_list);
    if let Some(set_area) = set_area {
        render_set_panel(frame, set_area, state);
    }
    (Some(list_area), layout[0])
}

fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let criteria = &state.criteria;
    let search = if state.search_active {
        format!("/{}_", criteria.search_prefix)
    } else if criteria.search_prefix.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", criteria.search_prefix)
    };
    let toggle = |on: bool| if on { "on" } else { "off" };
    let line = Line::from(vec![
        Span::raw("Search: "),
        Span::styled(search, Style::default().fg(ACCENT_TEAL)),
        Span::raw("  |  Type: "),
        Span::styled(
            criteria.type_filter.label().to_ascii_uppercase(),
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::raw("  |  Caught only: "),
        Span::styled(toggle(criteria.caught_only), Style::default().fg(ACCENT_TEAL)),
        Span::raw("  Shiny only: "),
        Span::styled(toggle(criteria.shiny_only), Style::default().fg(ACCENT_TEAL)),
        Span::raw(format!(
            "  |  {}/{}",
            state.visible.len(),
            state.entries().len()
        )),
    ]);
    let border = if state.search_active {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title("FILTER")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(border);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_list(frame: &mut Frame, area: Rect, state: &AppState, dex_list: &mut SelectList) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DEX")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = dex_items(state);
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state.selected_index.min(items.len().saturating_sub(1)),
        is_focused: !state.search_active && !state.login.active,
        style: dex_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::DexSelect,
        render_item: &|item| item.clone(),
    };
    dex_list.render(frame, inner, props);
}

fn render_set_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("SET")
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN));
    let text = state
        .selected_entry()
        .map(entry_text)
        .unwrap_or_default();
    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Detail text for one entry, masked when the species is not caught.
pub fn entry_text(entry: &PokedexEntry) -> Text<'static> {
    let view = entry.masked();
    let label = Style::default().fg(ACCENT_TEAL);
    let mut title = vec![Span::styled(
        format!("#{:03} {}", view.number, view.name),
        Style::default()
            .fg(ACCENT_GOLD)
            .add_modifier(Modifier::BOLD),
    )];
    if view.shiny {
        title.push(Span::styled(
            format!(" {SHINY_MARK}"),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    let mut lines = vec![Line::from(title)];
    if !view.caught {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Not caught yet.", Style::default().fg(TEXT_DIM)));
        return Text::from(lines);
    }

    let mut types = vec![Span::styled("Types: ", label)];
    for (idx, name) in view.types.iter().enumerate() {
        if idx > 0 {
            types.push(Span::raw(" / "));
        }
        types.push(Span::styled(name.clone(), Style::default().fg(type_color(name))));
    }
    lines.push(Line::from(types));
    if let Some(url) = view.sprite_url {
        lines.push(Line::from(vec![
            Span::styled("Sprite: ", label),
            Span::styled(url, Style::default().fg(TEXT_DIM)),
        ]));
    }
    lines.push(Line::raw(""));

    match entry.competitive_set.as_ref() {
        Some(set) => lines.extend(set_lines(set, &entry.set_moves, entry.item_sprite_url.as_deref())),
        None => lines.push(Line::styled(
            "No competitive set configured.",
            Style::default().fg(TEXT_DIM),
        )),
    }
    Text::from(lines)
}

fn set_lines(set: &CompetitiveSet, moves: &[MoveLine], item_sprite: Option<&str>) -> Vec<Line<'static>> {
    let label = Style::default().fg(ACCENT_TEAL);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(name, label), Span::raw(value)])
    };
    let or_dash = |value: &str| {
        if value.trim().is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };

    let mut lines = vec![
        field("Ability: ", or_dash(&set.ability)),
        field(
            "Item: ",
            if set.has_item() {
                set.held_item.clone()
            } else {
                "-".to_string()
            },
        ),
    ];
    if let Some(url) = item_sprite {
        lines.push(Line::from(vec![
            Span::styled("      ", label),
            Span::styled(url.to_string(), Style::default().fg(TEXT_DIM)),
        ]));
    }
    lines.push(field("Nature: ", or_dash(&set.nature)));
    lines.push(field(
        "EVs: ",
        match set.ev_summary() {
            Some(spread) => format!("{spread} ({} total)", set.effort_values.total()),
            None => "none".to_string(),
        },
    ));
    if set.individual_values.is_some() {
        lines.push(field(
            "IVs: ",
            set.iv_summary().unwrap_or_else(|| "all 31".to_string()),
        ));
    }
    lines.push(Line::styled("Moves:", label));
    if moves.is_empty() {
        lines.push(Line::styled("  -", Style::default().fg(TEXT_DIM)));
    }
    for line in moves {
        let mut spans = vec![Span::raw(format!("  {}", line.name))];
        if let Some(move_type) = line.move_type.as_deref() {
            spans.push(Span::styled(
                format!(" ({move_type})"),
                Style::default().fg(type_color(move_type)),
            ));
        }
        if line.learnable == Some(false) {
            spans.push(Span::styled(
                " not learnable",
                Style::default().fg(ACCENT_RED),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn render_login(frame: &mut Frame, area: Rect, state: &AppState) -> Rect {
    let popup = centered(area, 60, 7);
    frame.render_widget(Clear, popup);
    let mut lines = vec![
        Line::styled(
            "Trainer id or login link:",
            Style::default().fg(TEXT_DIM),
        ),
        Line::styled(
            format!("> {}_", state.login.input),
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(error) = state.login.error.as_deref() {
        lines.push(Line::styled(error.to_string(), Style::default().fg(ACCENT_RED)));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title("LOGIN")
        .style(Style::default().bg(BG_PANEL_ALT).fg(TEXT_MAIN))
        .border_style(Style::default().fg(ACCENT_GOLD));
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false }),
        popup,
    );
    popup
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = status_line(state);
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

/// The single status string: explicit message first, then loading state.
pub fn status_line(state: &AppState) -> String {
    if let Some(message) = state.message.as_ref() {
        return message.clone();
    }
    if state.profile.is_loading() {
        "Loading trainer...".to_string()
    } else if state.dex.is_loading() {
        "Loading pok\u{e9}dex...".to_string()
    } else if !state.skipped.is_empty() {
        format!("{} unknown species skipped", state.skipped.len())
    } else {
        String::new()
    }
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.login.active || state.search_active {
        let left = vec![
            StatusBarHint::new("Enter", "Apply"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        return (left, Vec::new());
    }

    let left = match state.view {
        View::Profile => vec![StatusBarHint::new("Enter", "Pok\u{e9}dex")],
        View::Pokedex => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("[ ]", "Type"),
            StatusBarHint::new("c", "Caught"),
            StatusBarHint::new("s", "Shiny"),
            StatusBarHint::new("x", "Reset"),
            StatusBarHint::new("Enter", "Set"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "View"),
        StatusBarHint::new("r", "Refresh"),
        StatusBarHint::new("L", "Login"),
        StatusBarHint::new("X", "Logout"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state.visible.iter().map(dex_row).collect()
}

fn dex_row(entry: &PokedexEntry) -> Line<'static> {
    let view = entry.masked();
    let mut spans = vec![Span::raw(format!("#{:03} {}", view.number, view.name))];
    if view.shiny {
        spans.push(Span::styled(
            format!(" {SHINY_MARK}"),
            Style::default().fg(ACCENT_GOLD),
        ));
    }
    for name in &view.types {
        spans.push(Span::styled(
            format!(" {name}"),
            Style::default().fg(type_color(name)),
        ));
    }
    if !view.caught {
        return Line::from(spans).style(Style::default().fg(TEXT_DIM));
    }
    Line::from(spans)
}

fn dex_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: None,
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn type_color(name: &str) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "grass" => Color::Rgb(120, 200, 80),
        "electric" => Color::Rgb(248, 208, 48),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        "dark" => Color::Rgb(112, 88, 72),
        _ => TEXT_DIM,
    }
}
