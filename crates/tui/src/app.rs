use chrono::NaiveDate;
use crossterm::event::KeyCode;
use eventdeck_api::{AttendeeUpdate, CreateEventRequest, EventRecord, UpdateEventRequest};
use eventdeck_api_client::LiveSubscription;
use ratatui::widgets::ListState;
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::async_ops::{AsyncCommand, CommandResult};
use crate::config::{self, Config};
pub use crate::views::modal::{ConfirmAction, Modal};

/// Which screen the user is viewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    EventList,
    EventForm,
    Login,
    Help,
}

/// Bucket filter over the event list. Upcoming/past compare the event date
/// to wall-clock "today" at evaluation time; events dated exactly today fall
/// in neither bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Upcoming,
    Past,
}

impl FilterMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Upcoming => "Upcoming",
            Self::Past => "Past",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Upcoming,
            Self::Upcoming => Self::Past,
            Self::Past => Self::All,
        }
    }
}

/// Result of the startup health probe, shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Unknown,
    Online(String),
    Offline,
}

/// Severity of the transient flash message shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Success,
    Error,
    Info,
}

/// Focusable field in the create/edit event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Description,
    Date,
}

impl FormField {
    const ORDER: [Self; 3] = [Self::Name, Self::Description, Self::Date];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Create/edit form state. `event_id` is `None` when creating.
#[derive(Debug, Clone)]
pub struct EventForm {
    pub event_id: Option<String>,
    pub name: String,
    pub description: String,
    pub date: String,
    pub focus: FormField,
}

impl EventForm {
    pub fn for_create() -> Self {
        Self {
            event_id: None,
            name: String::new(),
            description: String::new(),
            date: String::new(),
            focus: FormField::Name,
        }
    }

    pub fn for_edit(event: &EventRecord) -> Self {
        Self {
            event_id: Some(event.id.clone()),
            name: event.name.clone(),
            description: event.description.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            focus: FormField::Name,
        }
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
            FormField::Date => &mut self.date,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.event_id.is_some()
    }
}

/// Focusable field in the login/signup form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub signup_mode: bool,
    pub username: String,
    pub email: String,
    pub password: String,
    pub focus: LoginField,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            signup_mode: false,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
        }
    }
}

impl LoginForm {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn focus_next(&mut self) {
        self.focus = match (self.focus, self.signup_mode) {
            (LoginField::Username, _) => LoginField::Email,
            (LoginField::Email, _) => LoginField::Password,
            (LoginField::Password, true) => LoginField::Username,
            (LoginField::Password, false) => LoginField::Email,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match (self.focus, self.signup_mode) {
            (LoginField::Username, _) => LoginField::Password,
            (LoginField::Email, true) => LoginField::Username,
            (LoginField::Email, false) => LoginField::Password,
            (LoginField::Password, _) => LoginField::Email,
        };
    }

    fn toggle_mode(&mut self) {
        self.signup_mode = !self.signup_mode;
        if !self.signup_mode && self.focus == LoginField::Username {
            self.focus = LoginField::Email;
        }
    }
}

pub struct App {
    pub config: Config,

    // ── Event list state ──────────────────────────────────────────────
    /// Canonical list: the authoritative in-memory copy for this session.
    pub events: Vec<EventRecord>,
    /// Derived view: indices into `events`, replaced wholesale by
    /// `apply_filter` — never mutated incrementally.
    pub filtered_events: Vec<usize>,
    /// False until the initial fetch resolves. Live updates arriving
    /// earlier are parked in `pending_live`.
    pub events_loaded: bool,
    pub loading_events: bool,
    pub pending_live: VecDeque<AttendeeUpdate>,

    pub view: View,
    pub list_state: ListState,
    pub search_query: String,
    pub searching: bool,
    pub filter_mode: FilterMode,

    // ── Forms / overlays ──────────────────────────────────────────────
    pub form: Option<EventForm>,
    pub login_form: LoginForm,
    pub modal: Option<Modal>,
    pub flash_message: Option<(String, FlashLevel)>,

    // ── Async plumbing ────────────────────────────────────────────────
    pub pending_command: Option<AsyncCommand>,
    pub live_subscription: Option<LiveSubscription>,
    pub server_status: ServerStatus,
    pub health_check_done: bool,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Does `event` pass the bucket + search predicate? `search` must already be
/// lowercased.
fn event_matches(event: &EventRecord, mode: FilterMode, search: &str, today: NaiveDate) -> bool {
    let in_bucket = match mode {
        FilterMode::All => true,
        FilterMode::Upcoming => event.date > today,
        FilterMode::Past => event.date < today,
    };
    if !in_bucket {
        return false;
    }
    if search.is_empty() {
        return true;
    }
    event.name.to_lowercase().contains(search) || event.description.to_lowercase().contains(search)
}

/// Pure derivation of the filtered list from the canonical list.
pub fn filtered_indices(
    events: &[EventRecord],
    mode: FilterMode,
    search: &str,
    today: NaiveDate,
) -> Vec<usize> {
    let search = search.to_lowercase();
    events
        .iter()
        .enumerate()
        .filter(|(_, e)| event_matches(e, mode, &search, today))
        .map(|(i, _)| i)
        .collect()
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            events: Vec::new(),
            filtered_events: Vec::new(),
            events_loaded: false,
            loading_events: false,
            pending_live: VecDeque::new(),
            view: View::EventList,
            list_state: ListState::default(),
            search_query: String::new(),
            searching: false,
            filter_mode: FilterMode::All,
            form: None,
            login_form: LoginForm::default(),
            modal: None,
            flash_message: None,
            pending_command: None,
            live_subscription: None,
            server_status: ServerStatus::Unknown,
            health_check_done: false,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.config.session.is_signed_in()
    }

    pub fn selected_event(&self) -> Option<&EventRecord> {
        let idx = *self.filtered_events.get(self.list_state.selected()?)?;
        self.events.get(idx)
    }

    // ── Flash messages ────────────────────────────────────────────────

    pub fn flash_success(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Success));
    }

    pub fn flash_error(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Error));
    }

    pub fn flash_info(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), FlashLevel::Info));
    }

    // ── Filtering ─────────────────────────────────────────────────────

    /// Rebuild the filtered list from the canonical list. Called on every
    /// change to the canonical list, the filter mode, or the search text.
    pub fn apply_filter(&mut self) {
        self.filtered_events =
            filtered_indices(&self.events, self.filter_mode, &self.search_query, today());
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(if self.filtered_events.is_empty() {
            None
        } else {
            Some(selected.min(self.filtered_events.len() - 1))
        });
    }

    fn cycle_filter(&mut self) {
        self.filter_mode = self.filter_mode.cycle();
        self.apply_filter();
    }

    // ── Live updates ──────────────────────────────────────────────────

    /// Drain the realtime subscription. Called once per loop tick.
    pub fn poll_live(&mut self) {
        let mut updates = Vec::new();
        if let Some(ref mut sub) = self.live_subscription {
            while let Some(update) = sub.poll_update() {
                updates.push(update);
            }
        }
        for update in updates {
            self.apply_live_update(update);
        }
    }

    /// Apply one attendee notification, in receipt order.
    ///
    /// Before the initial fetch resolves the canonical list is empty, so the
    /// update is queued and replayed once the list is established. After
    /// that, an unknown event id means the event was deleted here or never
    /// fetched — the update is dropped without error.
    pub fn apply_live_update(&mut self, update: AttendeeUpdate) {
        if !self.events_loaded {
            self.pending_live.push_back(update);
            return;
        }
        match self.events.iter_mut().find(|e| e.id == update.event_id) {
            Some(event) => {
                event.add_attendee(&update.user_id);
                self.apply_filter();
            }
            None => debug!("dropping live update for unknown event {}", update.event_id),
        }
    }

    // ── Key handling ──────────────────────────────────────────────────

    /// Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        // Clear flash message on any key press
        self.flash_message = None;

        // Modal intercepts all keys when active
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        if self.searching {
            return self.handle_search_key(key);
        }

        match self.view {
            View::EventList => self.handle_list_key(key),
            View::EventForm => self.handle_form_key(key),
            View::Login => self.handle_login_key(key),
            View::Help => {
                // Any key exits help
                self.view = View::EventList;
                false
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.view = View::Help,
            KeyCode::Char('/') => {
                self.searching = true;
            }
            KeyCode::Char('f') => self.cycle_filter(),
            KeyCode::Char('r') => {
                self.loading_events = true;
                self.pending_command = Some(AsyncCommand::FetchEvents);
            }
            KeyCode::Char('n') => {
                if self.require_session("create events") {
                    self.form = Some(EventForm::for_create());
                    self.view = View::EventForm;
                }
            }
            KeyCode::Char('e') => {
                if self.require_session("edit events") {
                    let form = self.selected_event().map(EventForm::for_edit);
                    if let Some(form) = form {
                        self.form = Some(form);
                        self.view = View::EventForm;
                    }
                }
            }
            KeyCode::Char('d') => {
                if self.require_session("delete events") {
                    let target = self
                        .selected_event()
                        .map(|e| (e.id.clone(), e.name.clone()));
                    if let Some((event_id, name)) = target {
                        self.modal = Some(Modal::Confirm {
                            title: "Delete Event".to_string(),
                            message: format!("Delete \"{name}\"?"),
                            action: ConfirmAction::DeleteEvent { event_id },
                        });
                    }
                }
            }
            KeyCode::Char('a') => {
                if self.require_session("attend events") {
                    let event_id = self.selected_event().map(|e| e.id.clone());
                    if let Some(event_id) = event_id {
                        self.pending_command = Some(AsyncCommand::AttendEvent { event_id });
                    }
                }
            }
            KeyCode::Char('l') => {
                if self.is_signed_in() {
                    self.logout();
                } else {
                    self.login_form = LoginForm::default();
                    self.view = View::Login;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.list_next(),
            KeyCode::Up | KeyCode::Char('k') => self.list_prev(),
            KeyCode::Char('g') | KeyCode::Home => {
                if !self.filtered_events.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Char('G') | KeyCode::End => {
                if !self.filtered_events.is_empty() {
                    self.list_state.select(Some(self.filtered_events.len() - 1));
                }
            }
            _ => {}
        }
        false
    }

    /// Gate a mutating action behind a signed-in session. Anonymous mode is
    /// read-only, not an error.
    fn require_session(&mut self, what: &str) -> bool {
        if self.is_signed_in() {
            true
        } else {
            self.flash_info(format!("Sign in to {what} (press l)"));
            false
        }
    }

    fn handle_search_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc => {
                self.searching = false;
                self.search_query.clear();
                self.apply_filter();
            }
            KeyCode::Enter => {
                self.searching = false;
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.apply_filter();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.apply_filter();
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyCode) -> bool {
        let Some(ref mut form) = self.form else {
            self.view = View::EventList;
            return false;
        };
        match key {
            KeyCode::Esc => {
                self.form = None;
                self.view = View::EventList;
            }
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Char(c) => form.field_mut().push(c),
            KeyCode::Enter => self.submit_form(),
            _ => {}
        }
        false
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        if form.name.trim().is_empty() {
            self.flash_error("Event name is required");
            return;
        }
        let date = match NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                self.flash_error("Date must be YYYY-MM-DD");
                return;
            }
        };
        self.pending_command = Some(match form.event_id {
            Some(event_id) => AsyncCommand::UpdateEvent {
                event_id,
                req: UpdateEventRequest {
                    name: form.name.trim().to_string(),
                    description: form.description.trim().to_string(),
                    date,
                },
            },
            None => AsyncCommand::CreateEvent {
                req: CreateEventRequest {
                    name: form.name.trim().to_string(),
                    description: form.description.trim().to_string(),
                    date,
                },
            },
        });
    }

    fn handle_login_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Esc => self.view = View::EventList,
            KeyCode::Left | KeyCode::Right => self.login_form.toggle_mode(),
            KeyCode::Tab | KeyCode::Down => self.login_form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.login_form.focus_prev(),
            KeyCode::Backspace => {
                self.login_form.field_mut().pop();
            }
            KeyCode::Char(c) => self.login_form.field_mut().push(c),
            KeyCode::Enter => self.submit_login(),
            _ => {}
        }
        false
    }

    fn submit_login(&mut self) {
        let form = &self.login_form;
        if form.email.trim().is_empty() || form.password.is_empty() {
            self.flash_error("Email and password are required");
            return;
        }
        self.pending_command = Some(if form.signup_mode {
            if form.username.trim().is_empty() {
                self.flash_error("Username is required");
                return;
            }
            AsyncCommand::Signup {
                username: form.username.trim().to_string(),
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            }
        } else {
            AsyncCommand::Login {
                email: form.email.trim().to_string(),
                password: form.password.clone(),
            }
        });
    }

    fn handle_modal_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(Modal::Confirm { action, .. }) = self.modal.take() {
                    match action {
                        ConfirmAction::DeleteEvent { event_id } => {
                            self.pending_command = Some(AsyncCommand::DeleteEvent { event_id });
                        }
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => self.modal = None,
            _ => {}
        }
        false
    }

    fn logout(&mut self) {
        self.config.session.end();
        if let Err(e) = config::save_config(&self.config) {
            warn!("failed to persist config: {e}");
        }
        self.flash_success("Logged out");
    }

    // ── List navigation ───────────────────────────────────────────────

    fn list_next(&mut self) {
        let count = self.filtered_events.len();
        if count == 0 {
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some((selected + 1).min(count - 1)));
    }

    fn list_prev(&mut self) {
        if self.filtered_events.is_empty() {
            return;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(selected.saturating_sub(1)));
    }

    // ── Command results ───────────────────────────────────────────────

    pub fn apply_command_result(&mut self, result: CommandResult) {
        match result {
            CommandResult::Events(Ok(mut events)) => {
                // Server data is not trusted to keep the count in sync.
                for event in &mut events {
                    event.attendees_count = event.attendees.len();
                }
                self.events = events;
                self.events_loaded = true;
                self.loading_events = false;
                while let Some(update) = self.pending_live.pop_front() {
                    self.apply_live_update(update);
                }
                self.apply_filter();
            }
            CommandResult::Events(Err(e)) => {
                self.loading_events = false;
                self.events_loaded = true;
                self.flash_error(format!("Failed to load events: {e}"));
            }

            CommandResult::Created(Ok(mut event)) => {
                // Same distrust of server counts as the fetch path.
                event.attendees_count = event.attendees.len();
                self.events.push(event);
                self.apply_filter();
                self.form = None;
                self.view = View::EventList;
                self.flash_success("Event created");
            }
            CommandResult::Created(Err(e)) => {
                self.flash_error(format!("Failed to create event: {e}"));
            }

            CommandResult::Updated(Ok(updated)) => {
                // Patch name/description/date in place; attendees untouched.
                if let Some(event) = self.events.iter_mut().find(|e| e.id == updated.id) {
                    event.name = updated.name;
                    event.description = updated.description;
                    event.date = updated.date;
                }
                self.apply_filter();
                self.form = None;
                self.view = View::EventList;
                self.flash_success("Event updated");
            }
            CommandResult::Updated(Err(e)) => {
                // Form stays open so the edit can be retried.
                self.flash_error(format!("Failed to update event: {e}"));
            }

            CommandResult::Deleted(Ok(event_id)) => {
                self.events.retain(|e| e.id != event_id);
                self.apply_filter();
                self.flash_success("Event deleted");
            }
            CommandResult::Deleted(Err(e)) => {
                self.flash_error(format!("Failed to delete event: {e}"));
            }

            CommandResult::Attended(Ok(event_id)) => {
                // Same local-patch contract as a live update for our own id;
                // other viewers learn about it from the realtime channel.
                let user_id = self.config.session.user_id.clone();
                if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
                    event.add_attendee(&user_id);
                    self.apply_filter();
                }
            }
            CommandResult::Attended(Err(e)) => {
                // Logged only; no user-visible error for attend failures.
                warn!("attend request failed: {e}");
            }

            CommandResult::Auth(Ok(resp)) => {
                self.config.session.begin(resp.token, resp.user_id);
                if let Err(e) = config::save_config(&self.config) {
                    warn!("failed to persist config: {e}");
                }
                self.view = View::EventList;
                self.flash_success("Signed in");
                // Refetch so the list reflects the authenticated view.
                self.loading_events = true;
                self.pending_command = Some(AsyncCommand::FetchEvents);
            }
            CommandResult::Auth(Err(e)) => {
                self.flash_error(format!("Sign-in failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, name: &str, description: &str, date: (i32, u32, u32)) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            attendees: vec![],
            attendees_count: 0,
        }
    }

    fn loaded_app(events: Vec<EventRecord>) -> App {
        let mut app = App::new(Config::default());
        app.apply_command_result(CommandResult::Events(Ok(events)));
        app
    }

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn sample_events() -> Vec<EventRecord> {
        vec![
            event("1", "TechConf 2025", "Annual tech conference", (2099, 1, 1)),
            event("2", "Retro Meetup", "Looking back", (2020, 3, 10)),
            event("3", "Today Jam", "Same-day session", (2025, 6, 15)),
        ]
    }

    // ── Filtering properties ──────────────────────────────────────────

    #[test]
    fn filtering_never_invents_events() {
        let events = sample_events();
        for mode in [FilterMode::All, FilterMode::Upcoming, FilterMode::Past] {
            for search in ["", "conf", "zzz"] {
                let filtered = filtered_indices(&events, mode, search, fixed_today());
                assert!(filtered.iter().all(|&i| i < events.len()));
            }
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let events = sample_events();
        let first = filtered_indices(&events, FilterMode::Upcoming, "conf", fixed_today());
        let subset: Vec<EventRecord> = first.iter().map(|&i| events[i].clone()).collect();
        let second = filtered_indices(&subset, FilterMode::Upcoming, "conf", fixed_today());
        assert_eq!(second.len(), subset.len());
        assert_eq!(second, (0..subset.len()).collect::<Vec<_>>());
    }

    #[test]
    fn upcoming_and_past_buckets_exclude_today() {
        let events = sample_events();
        let upcoming = filtered_indices(&events, FilterMode::Upcoming, "", fixed_today());
        assert_eq!(upcoming, vec![0]);
        let past = filtered_indices(&events, FilterMode::Past, "", fixed_today());
        assert_eq!(past, vec![1]);
        // Dated exactly today → neither bucket.
        assert!(!upcoming.contains(&2));
        assert!(!past.contains(&2));
    }

    #[test]
    fn switching_filter_from_upcoming_to_past_empties_the_future_only_list() {
        let mut app = loaded_app(vec![event("1", "Conf", "", (2099, 1, 1))]);
        app.filter_mode = FilterMode::Upcoming;
        app.apply_filter();
        assert_eq!(app.filtered_events, vec![0]);

        app.filter_mode = FilterMode::Past;
        app.apply_filter();
        assert!(app.filtered_events.is_empty());
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn search_text_is_matched_verbatim_including_whitespace() {
        let events = vec![event("1", "TechConf 2025", "Annual gathering", (2099, 1, 1))];
        // "TechConf" has no space before "tech", so a leading space in the
        // query must not match.
        let with_space = filtered_indices(&events, FilterMode::All, " tech", fixed_today());
        assert!(with_space.is_empty());
        let plain = filtered_indices(&events, FilterMode::All, "tech", fixed_today());
        assert_eq!(plain, vec![0]);
    }

    #[test]
    fn search_matches_name_or_description_case_insensitively() {
        let events = sample_events();
        let by_name = filtered_indices(&events, FilterMode::All, "conf", fixed_today());
        assert_eq!(by_name, vec![0]);
        let by_description = filtered_indices(&events, FilterMode::All, "LOOKING", fixed_today());
        assert_eq!(by_description, vec![1]);
        let none = filtered_indices(&events, FilterMode::All, "nomatch", fixed_today());
        assert!(none.is_empty());
    }

    // ── Live updates ──────────────────────────────────────────────────

    #[test]
    fn live_update_appends_attendee_and_updates_count() {
        let mut app = loaded_app(sample_events());
        app.apply_live_update(AttendeeUpdate {
            event_id: "1".to_string(),
            user_id: "u9".to_string(),
        });

        let event = app.events.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(event.attendees, vec!["u9"]);
        assert_eq!(event.attendees_count, 1);
        // Still visible in the derived list.
        assert!(app.filtered_events.iter().any(|&i| app.events[i].id == "1"));
    }

    #[test]
    fn live_update_for_unknown_event_leaves_both_lists_unchanged() {
        let mut app = loaded_app(sample_events());
        let events_before = app.events.clone();
        let filtered_before = app.filtered_events.clone();

        app.apply_live_update(AttendeeUpdate {
            event_id: "missing".to_string(),
            user_id: "u9".to_string(),
        });

        assert_eq!(app.events, events_before);
        assert_eq!(app.filtered_events, filtered_before);
    }

    #[test]
    fn duplicate_live_updates_are_idempotent() {
        let mut app = loaded_app(sample_events());
        for _ in 0..3 {
            app.apply_live_update(AttendeeUpdate {
                event_id: "1".to_string(),
                user_id: "u9".to_string(),
            });
        }
        let event = app.events.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(event.attendees_count, 1);
    }

    #[test]
    fn updates_before_initial_load_are_queued_and_replayed_in_order() {
        let mut app = App::new(Config::default());
        for user in ["u1", "u2"] {
            app.apply_live_update(AttendeeUpdate {
                event_id: "1".to_string(),
                user_id: user.to_string(),
            });
        }
        assert!(app.events.is_empty());
        assert_eq!(app.pending_live.len(), 2);

        app.apply_command_result(CommandResult::Events(Ok(sample_events())));

        assert!(app.pending_live.is_empty());
        let event = app.events.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(event.attendees, vec!["u1", "u2"]);
        assert_eq!(event.attendees_count, 2);
    }

    #[test]
    fn attendee_count_matches_list_length_after_every_operation() {
        let mut app = loaded_app(sample_events());
        app.apply_live_update(AttendeeUpdate {
            event_id: "1".to_string(),
            user_id: "u9".to_string(),
        });
        app.apply_command_result(CommandResult::Created(Ok(event(
            "9",
            "Launch Party",
            "Ship it",
            (2099, 3, 3),
        ))));
        app.apply_command_result(CommandResult::Updated(Ok(event(
            "1",
            "TechConf 2026",
            "Rescheduled",
            (2099, 2, 2),
        ))));
        app.apply_command_result(CommandResult::Deleted(Ok("2".to_string())));

        for event in &app.events {
            assert_eq!(event.attendees_count, event.attendees.len());
        }
    }

    #[test]
    fn created_event_count_is_recomputed_from_its_attendee_list() {
        let mut app = loaded_app(sample_events());
        let mut created = event("9", "Launch Party", "Ship it", (2099, 3, 3));
        // A server response whose count disagrees with its list.
        created.attendees_count = 5;

        app.apply_command_result(CommandResult::Created(Ok(created)));

        let event = app.events.iter().find(|e| e.id == "9").unwrap();
        assert!(event.attendees.is_empty());
        assert_eq!(event.attendees_count, 0);
    }

    // ── Mutations ─────────────────────────────────────────────────────

    #[test]
    fn edit_patches_fields_in_place_and_leaves_attendees() {
        let mut app = loaded_app(sample_events());
        app.apply_live_update(AttendeeUpdate {
            event_id: "1".to_string(),
            user_id: "u9".to_string(),
        });

        app.apply_command_result(CommandResult::Updated(Ok(event(
            "1",
            "TechConf 2026",
            "Moved a year",
            (2099, 2, 2),
        ))));

        let event = app.events.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(event.name, "TechConf 2026");
        assert_eq!(event.description, "Moved a year");
        assert_eq!(event.attendees, vec!["u9"]);
        assert!(matches!(
            app.flash_message,
            Some((_, FlashLevel::Success))
        ));
    }

    #[test]
    fn failed_edit_leaves_state_untouched_and_keeps_the_form() {
        let mut app = loaded_app(sample_events());
        let events_before = app.events.clone();
        app.form = Some(EventForm::for_edit(&app.events[0].clone()));
        app.view = View::EventForm;

        app.apply_command_result(CommandResult::Updated(Err("500: boom".to_string())));

        assert_eq!(app.events, events_before);
        assert!(app.form.is_some());
        assert!(matches!(app.flash_message, Some((_, FlashLevel::Error))));
    }

    #[test]
    fn confirmed_delete_removes_event_from_both_lists() {
        let mut app = loaded_app(sample_events());
        app.search_query = "conf".to_string();
        app.apply_filter();
        assert!(!app.filtered_events.is_empty());

        app.apply_command_result(CommandResult::Deleted(Ok("1".to_string())));

        assert!(app.events.iter().all(|e| e.id != "1"));
        assert!(app.filtered_events.iter().all(|&i| app.events[i].id != "1"));
    }

    #[test]
    fn attend_success_applies_the_live_update_patch_for_own_user() {
        let mut app = loaded_app(sample_events());
        app.config
            .session
            .begin("tok".to_string(), "me".to_string());

        app.apply_command_result(CommandResult::Attended(Ok("1".to_string())));

        let event = app.events.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(event.attendees, vec!["me"]);
        assert_eq!(event.attendees_count, 1);
    }

    #[test]
    fn attend_failure_is_silent_for_the_user() {
        let mut app = loaded_app(sample_events());
        let events_before = app.events.clone();

        app.apply_command_result(CommandResult::Attended(Err("network down".to_string())));

        assert_eq!(app.events, events_before);
        assert!(app.flash_message.is_none());
    }

    #[test]
    fn fetch_failure_flashes_and_degrades_to_empty_list() {
        let mut app = App::new(Config::default());
        app.apply_command_result(CommandResult::Events(Err("connection refused".to_string())));

        assert!(app.events.is_empty());
        assert!(app.filtered_events.is_empty());
        assert!(matches!(app.flash_message, Some((_, FlashLevel::Error))));
    }

    // ── Read-only gating ──────────────────────────────────────────────

    #[test]
    fn anonymous_sessions_cannot_trigger_mutations() {
        let mut app = loaded_app(sample_events());
        assert!(!app.is_signed_in());

        app.handle_key(KeyCode::Char('d'));
        assert!(app.modal.is_none());
        assert!(app.pending_command.is_none());
        assert!(matches!(app.flash_message, Some((_, FlashLevel::Info))));

        app.handle_key(KeyCode::Char('a'));
        assert!(app.pending_command.is_none());
    }

    #[test]
    fn search_keys_rebuild_the_filtered_list() {
        let mut app = loaded_app(sample_events());
        app.handle_key(KeyCode::Char('/'));
        assert!(app.searching);
        for c in "conf".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert_eq!(app.filtered_events, vec![0]);

        app.handle_key(KeyCode::Esc);
        assert!(!app.searching);
        assert!(app.search_query.is_empty());
        assert_eq!(app.filtered_events.len(), app.events.len());
    }
}
