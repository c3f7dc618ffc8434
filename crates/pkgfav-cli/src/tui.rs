//! Interactive two-screen terminal UI
//!
//! Search screen: type a term, pick a result, give a reason. Favorites
//! screen: view, edit, or remove saved packages. Tab switches screens.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::*;

use pkgfav::kv::KeyValueStore;
use pkgfav_app::app::{
    AddFlow, AppState, FavoritesAction, FavoritesMode, Route, SearchController, SearchStatus,
};
use pkgfav_app::config::ui::EMPTY_FAVORITES_TEXT;

struct Tui<S: KeyValueStore> {
    state: AppState<S>,
    controller: SearchController,
    running: bool,
}

/// Run the UI until the user quits
pub fn run<S: KeyValueStore>(state: AppState<S>, controller: SearchController) -> io::Result<()> {
    let mut tui = Tui {
        state,
        controller,
        running: true,
    };

    enter_screen(&mut io::stdout(), terminal::enable_raw_mode, terminal::disable_raw_mode)?;
    let backend = CrosstermBackend::new(io::stdout());
    let result = Terminal::new(backend).and_then(|mut terminal| tui.event_loop(&mut terminal));

    // Restore the terminal even if the loop failed
    let restored = leave_screen(&mut io::stdout(), terminal::disable_raw_mode);
    result.and(restored)
}

/// Switch to raw mode and the alternate screen
///
/// Raw mode is turned back off if the screen switch fails.
fn enter_screen<W: io::Write>(
    out: &mut W,
    enable_raw: fn() -> io::Result<()>,
    disable_raw: fn() -> io::Result<()>,
) -> io::Result<()> {
    enable_raw()?;
    if let Err(e) = out.execute(EnterAlternateScreen) {
        let _ = disable_raw();
        return Err(e);
    }
    Ok(())
}

/// Undo [`enter_screen`]; both steps run even if one fails
fn leave_screen<W: io::Write>(out: &mut W, disable_raw: fn() -> io::Result<()>) -> io::Result<()> {
    let raw = disable_raw();
    let screen = out.execute(LeaveAlternateScreen).map(|_| ());
    raw.and(screen)
}

impl<S: KeyValueStore> Tui<S> {
    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let tick_rate = Duration::from_millis(50);

        while self.running {
            terminal.draw(|f| draw_ui(f, self))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.poll(Instant::now());
        }
        Ok(())
    }

    /// Feed finished searches to the view and advance the add delay
    fn poll(&mut self, now: Instant) {
        for event in self.controller.drain() {
            self.state.search.complete(event.generation, event.result);
        }
        self.state.search.tick(now);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match self.state.route {
            Route::Search => self.handle_search_key(key),
            Route::Favorites => self.handle_favorites_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let search = &mut self.state.search;

        // Any key acknowledges an error popup
        if search.add_flow() == &AddFlow::Closed && search.dismiss_error() {
            return;
        }

        match search.add_flow().clone() {
            AddFlow::Adding { .. } => {}
            AddFlow::CapturingReason { mut reason, .. } => match key.code {
                KeyCode::Enter => {
                    search.confirm_add(&mut self.state.store, Instant::now());
                }
                KeyCode::Esc => {
                    search.cancel_selection();
                }
                KeyCode::Backspace => {
                    reason.pop();
                    search.update_reason(reason);
                }
                KeyCode::Char(c) => {
                    reason.push(c);
                    search.update_reason(reason);
                }
                _ => {}
            },
            AddFlow::Closed => match key.code {
                KeyCode::Esc => self.running = false,
                KeyCode::Tab => self.state.navigate(self.state.route.toggled()),
                KeyCode::Up => search.select_previous(),
                KeyCode::Down => search.select_next(),
                KeyCode::Enter => {
                    if let Some(name) = search.selected_result().map(|r| r.name.clone()) {
                        search.select(&name, &self.state.store);
                    }
                }
                KeyCode::Backspace => {
                    let mut term = search.term().to_string();
                    term.pop();
                    self.set_term(term);
                }
                KeyCode::Char(c) => {
                    let mut term = search.term().to_string();
                    term.push(c);
                    self.set_term(term);
                }
                _ => {}
            },
        }
    }

    fn set_term(&mut self, term: String) {
        if let Some(request) = self.state.search.set_term(term) {
            self.controller.dispatch(&request);
        }
    }

    fn handle_favorites_key(&mut self, key: KeyEvent) {
        if self.state.favorites.mode() == &FavoritesMode::Idle && self.state.favorites.dismiss_error() {
            return;
        }

        let view = &self.state.favorites;
        let selected = view.selected_entry().map(|e| e.package_name.clone());

        let action = match view.mode().clone() {
            FavoritesMode::Idle => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.running = false;
                    None
                }
                KeyCode::Tab => {
                    self.state.navigate(self.state.route.toggled());
                    None
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.state.favorites.select_previous();
                    None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.state.favorites.select_next();
                    None
                }
                KeyCode::Enter | KeyCode::Char('v') => selected.map(FavoritesAction::View),
                KeyCode::Char('e') => selected.map(FavoritesAction::StartEdit),
                KeyCode::Char('d') | KeyCode::Delete => selected.map(FavoritesAction::RequestRemoval),
                _ => None,
            },
            FavoritesMode::ConfirmingRemoval { .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(FavoritesAction::ConfirmRemoval),
                KeyCode::Char('n') | KeyCode::Esc => Some(FavoritesAction::Cancel),
                _ => None,
            },
            FavoritesMode::Editing { mut draft, .. } => match key.code {
                KeyCode::Enter => Some(FavoritesAction::Save),
                KeyCode::Esc => Some(FavoritesAction::Cancel),
                KeyCode::Backspace => {
                    draft.pop();
                    Some(FavoritesAction::UpdateDraft(draft))
                }
                KeyCode::Char(c) => {
                    draft.push(c);
                    Some(FavoritesAction::UpdateDraft(draft))
                }
                _ => None,
            },
            FavoritesMode::ViewingReason { .. } => match key.code {
                KeyCode::Enter | KeyCode::Esc => Some(FavoritesAction::Close),
                _ => None,
            },
        };

        if let Some(action) = action {
            self.state.favorites.apply(&mut self.state.store, action);
        }
    }
}

// =============================================================================
// Drawing
// =============================================================================

fn draw_ui<S: KeyValueStore>(f: &mut Frame, tui: &Tui<S>) {
    let area = f.area();

    let outer = Block::default()
        .title(format!(" pkgfav v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // tabs
        Constraint::Min(5),    // screen
        Constraint::Length(1), // help bar
    ])
    .split(inner);

    let selected_tab = match tui.state.route {
        Route::Search => 0,
        Route::Favorites => 1,
    };
    let tabs = Tabs::new(vec![Route::Search.title(), Route::Favorites.title()])
        .select(selected_tab)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    f.render_widget(tabs, chunks[0]);

    match tui.state.route {
        Route::Search => draw_search(f, tui, chunks[1]),
        Route::Favorites => draw_favorites(f, tui, chunks[1]),
    }
    draw_help(f, tui, chunks[2]);
}

fn draw_search<S: KeyValueStore>(f: &mut Frame, tui: &Tui<S>, area: Rect) {
    let search = &tui.state.search;
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);

    let input = Paragraph::new(search.term()).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(input, rows[0]);

    let results_block = Block::default()
        .title(" Results ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    match search.status() {
        SearchStatus::Idle => {
            f.render_widget(Paragraph::new("").block(results_block), rows[1]);
        }
        SearchStatus::Loading => {
            let text = Span::styled("  Loading...", Style::default().fg(Color::Yellow));
            f.render_widget(Paragraph::new(text).block(results_block), rows[1]);
        }
        SearchStatus::Failed(message) => {
            let text = Span::styled(format!("  {message}"), Style::default().fg(Color::Red));
            f.render_widget(Paragraph::new(text).block(results_block), rows[1]);
        }
        SearchStatus::Loaded(items) => {
            let max_desc = rows[1].width.saturating_sub(4) as usize;
            let list_items: Vec<ListItem> = items
                .iter()
                .map(|item| {
                    let favorite = tui.state.store.is_favorite(&item.name);
                    let marker = if favorite { "* " } else { "  " };
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(marker, Style::default().fg(Color::Yellow)),
                            Span::styled(item.name.as_str(), Style::default().fg(Color::White).bold()),
                        ]),
                        Line::from(Span::styled(
                            format!("  {}", truncate_str(&item.description, max_desc)),
                            Style::default().fg(Color::DarkGray),
                        )),
                    ])
                })
                .collect();
            let list = List::new(list_items)
                .block(results_block)
                .highlight_style(Style::default().bg(Color::DarkGray));
            let mut list_state = ListState::default().with_selected(Some(search.selected_index()));
            f.render_stateful_widget(list, rows[1], &mut list_state);
        }
    }

    match search.add_flow() {
        AddFlow::Closed => {
            if let Some(err) = search.error() {
                draw_popup(f, " Error ", Vec::new(), PopupBody::error(err));
            }
        }
        AddFlow::CapturingReason { name, reason } => {
            let mut header = package_header(name);
            header.push(Line::from(Span::styled(
                "  Why is this a favorite?",
                Style::default().fg(Color::DarkGray),
            )));
            draw_popup(f, " Add to Favorites ", header, PopupBody::input(&format!("{reason}_")));
        }
        AddFlow::Adding { name, .. } => {
            draw_popup(
                f,
                " Add to Favorites ",
                Vec::new(),
                PopupBody::text(&format!("Adding {name}..."), Style::default().fg(Color::Yellow)),
            );
        }
    }
}

fn draw_favorites<S: KeyValueStore>(f: &mut Frame, tui: &Tui<S>, area: Rect) {
    let view = &tui.state.favorites;
    let block = Block::default()
        .title(format!(" {} ", Route::Favorites.title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    if view.is_empty() {
        let text = Span::styled(format!("  {EMPTY_FAVORITES_TEXT}"), Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(text).block(block), area);
    } else {
        let name_width = view
            .entries()
            .iter()
            .map(|e| e.package_name.chars().count())
            .max()
            .unwrap_or(0);
        let max_reason = (area.width as usize).saturating_sub(name_width + 8);
        let items: Vec<ListItem> = view
            .entries()
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("  {:<width$}  ", entry.package_name, width = name_width),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        truncate_str(&entry.reason_or_empty().replace('\n', " "), max_reason),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray));
        let mut list_state = ListState::default().with_selected(Some(view.selected_index()));
        f.render_stateful_widget(list, area, &mut list_state);
    }

    match view.mode() {
        FavoritesMode::Idle => {
            if let Some(err) = view.error() {
                draw_popup(f, " Error ", Vec::new(), PopupBody::error(err));
            }
        }
        FavoritesMode::ConfirmingRemoval { name } => {
            draw_popup(
                f,
                " Remove Favorite ",
                Vec::new(),
                PopupBody::text(&format!("Remove {name} from favorites? (y/n)"), Style::default()),
            );
        }
        FavoritesMode::Editing { name, draft } => {
            draw_popup(
                f,
                " Edit Reason ",
                package_header(name),
                PopupBody::input(&format!("{draft}_")),
            );
        }
        FavoritesMode::ViewingReason { name } => {
            let reason = view.viewed_reason().unwrap_or_default();
            draw_popup(f, " Reason ", package_header(name), PopupBody::text(reason, Style::default()));
        }
    }
}

/// Popup width as a percentage of the frame
const POPUP_WIDTH_PERCENT: u16 = 60;

/// Free text below a popup's header, wrapped to the popup width
struct PopupBody<'a> {
    text: &'a str,
    style: Style,
    /// On overflow keep the end visible instead of the start
    follow_end: bool,
}

impl<'a> PopupBody<'a> {
    fn text(text: &'a str, style: Style) -> Self {
        Self {
            text,
            style,
            follow_end: false,
        }
    }

    fn input(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default().fg(Color::White),
            follow_end: true,
        }
    }

    fn error(text: &'a str) -> Self {
        Self::text(text, Style::default().fg(Color::Red))
    }
}

fn package_header(name: &str) -> Vec<Line<'_>> {
    vec![
        Line::from(vec![
            Span::styled("  Package: ", Style::default().fg(Color::DarkGray)),
            Span::styled(name, Style::default().fg(Color::White).bold()),
        ]),
        Line::from(""),
    ]
}

/// Draw a centered popup tall enough for its wrapped body, capped at the frame
fn draw_popup(f: &mut Frame, title: &str, header: Vec<Line>, body: PopupBody) {
    let frame = f.area();
    let [_, column, _] = popup_columns(frame);
    // Borders plus the two-space indent
    let text_width = column.width.saturating_sub(4) as usize;

    let mut wrapped = wrap_text(body.text, text_width);
    let room = (frame.height.saturating_sub(2) as usize).saturating_sub(header.len());
    if wrapped.len() > room {
        if body.follow_end {
            wrapped.drain(..wrapped.len() - room);
        } else {
            wrapped.truncate(room);
        }
    }

    let mut lines = header;
    lines.extend(
        wrapped
            .into_iter()
            .map(|line| Line::from(Span::styled(format!("  {line}"), body.style))),
    );

    let height = (lines.len() as u16).saturating_add(2).min(frame.height);
    let area = centered_rect(height, frame);
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn popup_columns(area: Rect) -> [Rect; 3] {
    let side = (100 - POPUP_WIDTH_PERCENT) / 2;
    Layout::horizontal([
        Constraint::Percentage(side),
        Constraint::Percentage(POPUP_WIDTH_PERCENT),
        Constraint::Percentage(side),
    ])
    .areas(area)
}

fn centered_rect(height: u16, area: Rect) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, column, _] = popup_columns(row);
    column
}

/// Word-wrap `text` to `width` columns
///
/// Newlines always break. Words longer than a line are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split(' ') {
            let word_len = word.chars().count();
            if len > 0 && len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                len = 0;
            } else if len > 0 {
                line.push(' ');
                len += 1;
            }
            for c in word.chars() {
                if len == width {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                }
                line.push(c);
                len += 1;
            }
        }
        lines.push(line);
    }
    lines
}

fn draw_help<S: KeyValueStore>(f: &mut Frame, tui: &Tui<S>, area: Rect) {
    let keys: &[(&str, &str)] = match tui.state.route {
        Route::Search => match tui.state.search.add_flow() {
            AddFlow::Closed => &[("Tab", "favorites"), ("Enter", "add"), ("Esc", "quit")],
            AddFlow::CapturingReason { .. } => &[("Enter", "save"), ("Esc", "cancel")],
            AddFlow::Adding { .. } => &[],
        },
        Route::Favorites => match tui.state.favorites.mode() {
            FavoritesMode::Idle => &[
                ("Tab", "search"),
                ("v", "view"),
                ("e", "edit"),
                ("d", "remove"),
                ("q", "quit"),
            ],
            FavoritesMode::ConfirmingRemoval { .. } => &[("y", "remove"), ("n", "keep")],
            FavoritesMode::Editing { .. } => &[("Enter", "save"), ("Esc", "cancel")],
            FavoritesMode::ViewingReason { .. } => &[("Esc", "close")],
        },
    };

    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  |  "));
        }
        let prefix = if i == 0 { "  " } else { "" };
        spans.push(Span::styled(format!("{prefix}'{key}' "), Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(*label));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Left), area);
}

fn truncate_str(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use ratatui::backend::TestBackend;

    use pkgfav::favorites::FavoritesStore;
    use pkgfav::kv::MemoryStore;
    use pkgfav::types::SearchResultItem;
    use pkgfav_app::error::Result;
    use pkgfav_app::providers::{PackageProvider, SearchResults};

    struct FixedProvider;

    impl PackageProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "Fixed"
        }

        fn id(&self) -> &'static str {
            "fixed"
        }

        fn search(&self, term: &str) -> Result<SearchResults> {
            Ok(SearchResults {
                items: vec![SearchResultItem::new(term, "matched")],
                total: Some(1),
            })
        }
    }

    fn tui() -> Tui<MemoryStore> {
        let store = FavoritesStore::new(MemoryStore::new());
        Tui {
            state: AppState::new(store, Duration::from_millis(0)),
            controller: SearchController::new(Arc::new(FixedProvider)),
            running: true,
        }
    }

    fn press(tui: &mut Tui<MemoryStore>, code: KeyCode) {
        tui.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(tui: &mut Tui<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(tui, KeyCode::Char(c));
        }
    }

    fn wait_for_results(tui: &mut Tui<MemoryStore>) {
        while tui.state.search.is_loading() {
            if let Some(event) = tui.controller.recv_timeout(Duration::from_secs(5)) {
                tui.state.search.complete(event.generation, event.result);
            } else {
                panic!("search did not finish");
            }
        }
    }

    fn render(tui: &Tui<MemoryStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw_ui(f, tui)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut screen = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                screen.push_str(buffer[(x, y)].symbol());
            }
            screen.push('\n');
        }
        screen
    }

    #[test]
    fn test_search_then_add_with_reason() {
        let mut tui = tui();
        type_text(&mut tui, "lodash");
        wait_for_results(&mut tui);
        assert_eq!(tui.state.search.results()[0].name, "lodash");

        press(&mut tui, KeyCode::Enter);
        type_text(&mut tui, "utils");
        press(&mut tui, KeyCode::Enter);
        assert_eq!(tui.state.store.get_reason("lodash").as_deref(), Some("utils"));

        tui.poll(Instant::now());
        assert_eq!(tui.state.search.add_flow(), &AddFlow::Closed);
    }

    #[test]
    fn test_tab_switches_screens_and_refreshes() {
        let mut tui = tui();
        tui.state.store.add_favorite("react", Some("ui")).unwrap();

        press(&mut tui, KeyCode::Tab);
        assert_eq!(tui.state.route, Route::Favorites);
        assert_eq!(tui.state.favorites.entries().len(), 1);

        press(&mut tui, KeyCode::Tab);
        assert_eq!(tui.state.route, Route::Search);
    }

    #[test]
    fn test_remove_from_favorites_screen() {
        let mut tui = tui();
        tui.state.store.add_favorite("react", Some("ui")).unwrap();
        press(&mut tui, KeyCode::Tab);

        press(&mut tui, KeyCode::Char('d'));
        press(&mut tui, KeyCode::Char('n'));
        assert!(tui.state.store.is_favorite("react"));

        press(&mut tui, KeyCode::Char('d'));
        press(&mut tui, KeyCode::Char('y'));
        assert!(!tui.state.store.is_favorite("react"));
        assert!(tui.state.store.get_reason("react").is_none());
    }

    #[test]
    fn test_edit_reason_from_favorites_screen() {
        let mut tui = tui();
        tui.state.store.add_favorite("vite", Some("fast")).unwrap();
        press(&mut tui, KeyCode::Tab);

        press(&mut tui, KeyCode::Char('e'));
        type_text(&mut tui, "er");
        press(&mut tui, KeyCode::Enter);
        assert_eq!(tui.state.store.get_reason("vite").as_deref(), Some("faster"));
    }

    #[test]
    fn test_quit_keys() {
        let mut tui = tui();
        tui.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!tui.running);

        let mut tui = self::tui();
        press(&mut tui, KeyCode::Esc);
        assert!(!tui.running);
    }

    #[test]
    fn test_long_reason_is_wrapped_into_view() {
        let mut tui = tui();
        let reason = format!("{} ENDMARK", "word ".repeat(40));
        tui.state.store.add_favorite("lodash", Some(&reason)).unwrap();
        press(&mut tui, KeyCode::Tab);
        press(&mut tui, KeyCode::Char('v'));

        let screen = render(&tui);
        assert!(screen.contains("Package: lodash"));
        assert!(screen.contains("ENDMARK"));
    }

    #[test]
    fn test_multiline_reason_keeps_its_lines() {
        let mut tui = tui();
        tui.state
            .store
            .add_favorite("lodash", Some("first point\nsecond point"))
            .unwrap();
        press(&mut tui, KeyCode::Tab);
        press(&mut tui, KeyCode::Char('v'));

        let screen = render(&tui);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows.windows(2).any(|pair| {
            pair[0].contains("first point")
                && !pair[0].contains("second point")
                && pair[1].contains("second point")
        }));
    }

    #[test]
    fn test_overflowing_draft_shows_its_end() {
        let mut tui = tui();
        tui.state
            .store
            .add_favorite("lodash", Some(&"word ".repeat(300)))
            .unwrap();
        press(&mut tui, KeyCode::Tab);
        press(&mut tui, KeyCode::Char('e'));
        type_text(&mut tui, "TAIL");

        let screen = render(&tui);
        assert!(screen.contains("TAIL_"));
        assert!(screen.contains("Package: lodash"));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 5), vec![""]);
    }

    #[test]
    fn test_any_key_dismisses_add_error() {
        let mut tui = tui();
        type_text(&mut tui, "lodash");
        wait_for_results(&mut tui);
        tui.state.store.adapter_mut().set_available(false);

        press(&mut tui, KeyCode::Enter);
        press(&mut tui, KeyCode::Enter);
        assert!(tui.state.search.error().is_some());

        press(&mut tui, KeyCode::Enter);
        assert!(tui.state.search.error().is_none());
        assert_eq!(tui.state.search.add_flow(), &AddFlow::Closed);
        assert!(tui.running);
    }

    #[test]
    fn test_any_key_dismisses_favorites_error() {
        let mut tui = tui();
        tui.state.store.add_favorite("vite", Some("fast")).unwrap();
        press(&mut tui, KeyCode::Tab);
        tui.state.store.adapter_mut().set_available(false);

        press(&mut tui, KeyCode::Char('e'));
        press(&mut tui, KeyCode::Enter);
        assert!(tui.state.favorites.error().is_some());

        press(&mut tui, KeyCode::Esc);
        assert!(tui.state.favorites.error().is_none());
        assert!(tui.running);
    }

    struct ClosedPipe;

    impl io::Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    static RAW_MODE: AtomicBool = AtomicBool::new(false);

    fn raw_on() -> io::Result<()> {
        RAW_MODE.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn raw_off() -> io::Result<()> {
        RAW_MODE.store(false, Ordering::SeqCst);
        Ok(())
    }

    #[test]
    fn test_screen_setup_and_teardown_restore_raw_mode() {
        assert!(enter_screen(&mut ClosedPipe, raw_on, raw_off).is_err());
        assert!(!RAW_MODE.load(Ordering::SeqCst));

        let mut out = Vec::new();
        enter_screen(&mut out, raw_on, raw_off).unwrap();
        assert!(RAW_MODE.load(Ordering::SeqCst));

        // Raw mode is left even when the screen switch cannot be written
        assert!(leave_screen(&mut ClosedPipe, raw_off).is_err());
        assert!(!RAW_MODE.load(Ordering::SeqCst));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a long description", 9), "a long...");
        assert_eq!(truncate_str("héllo wörld", 8), "héllo...");
    }
}
