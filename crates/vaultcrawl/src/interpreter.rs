//! # Command Interpreter
//!
//! Dispatches parsed commands against the engine and writes the results to
//! the log. Player mistakes are reported, never raised.
//!
//! Room text follows a two-tier reveal: a discovered but sealed room is only
//! ever a "Sealed folio"; its title and content appear once unsealed. Void
//! cells all read the same.


use vaultcrawl_core::{is_void_room, Direction};

use crate::autocomplete::LinkAutocomplete;
use crate::command::{Command, HELP_TEXT};
use crate::engine::Engine;
use crate::host::{HostOutcome, HostRequest};
use crate::log::LogAuthor;
use crate::navigation::{MoveOutcome, UnsealOutcome};
use crate::render::{render_map, MapWindow};
use crate::search::search_rooms;

const SEALED_TITLE: &str = "Sealed folio";
const VOID_TITLE: &str = "Empty chamber";
const VOID_DESCRIPTION: &str = "Bare stone and still air. Nothing was ever written here.";
const SEALED_DESCRIPTION: &str = "A sealed folio rests on a lectern. Open it to learn what it holds.";
const EXCERPT_CHARS: usize = 160;

impl Engine {
    /// Runs one line. Returns the host request it is waiting on, if any.
    pub(crate) fn execute(&mut self, line: &str) -> Option<HostRequest> {
        let command = Command::parse(line);
        if command == Command::Empty {
            return None;
        }
        self.log.push(LogAuthor::Player, format!("> {}", line.trim()));
        self.nav.command_history_mut().record(line);
        self.autocomplete.clear();
        tracing::debug!("Command: {:?}", command);

        let request = match command {
            Command::Empty => None,
            Command::Move(dir) => {
                self.walk(dir);
                None
            }
            Command::BadDirection(word) => {
                if word.is_empty() {
                    self.log.system("Go where?");
                } else {
                    self.log.system(format!("\"{word}\" is not a direction."));
                }
                None
            }
            Command::Look => {
                self.describe_current();
                None
            }
            Command::Where => {
                self.report_position();
                None
            }
            Command::Map => {
                self.draw_map(false);
                None
            }
            Command::Big => {
                self.draw_map(true);
                None
            }
            Command::Exits => {
                self.report_exits();
                None
            }
            Command::Stats => {
                self.report_stats();
                None
            }
            Command::Inventory => {
                self.report_inventory();
                None
            }
            Command::Open => self.begin_open(),
            Command::Back => {
                self.go_back();
                None
            }
            Command::Teleport(query) => {
                self.teleport(&query);
                None
            }
            Command::Search(query) => {
                self.search(&query);
                None
            }
            Command::Link(query) => self.begin_link(line, &query),
            Command::Help => {
                self.log.system(HELP_TEXT);
                None
            }
            Command::Unknown(verb) => {
                self.log.system(format!("I don't understand \"{verb}\". Type `help` for commands."));
                None
            }
        };

        self.in_flight.clone_from(&request);
        request
    }

    /// Finishes a host round trip.
    pub(crate) fn apply_outcome(&mut self, request: HostRequest, outcome: HostOutcome) {
        match (request, outcome) {
            (HostRequest::ReadDocument { room }, HostOutcome::Content(result)) => match result {
                Ok(Some(text)) => self.finish_open(&room, &text),
                Ok(None) => {
                    self.log
                        .system(format!("The folio has crumbled to dust: {room} no longer exists."));
                }
                Err(e) => {
                    tracing::warn!("Reading {} failed: {}", room, e);
                    self.log.system(format!("Could not open {room}: {e}"));
                }
            },
            (HostRequest::CreateLink { from, to }, HostOutcome::Linked(result)) => match result {
                Ok(()) => self.finish_link(&from, &to),
                Err(e) => {
                    tracing::warn!("Linking {} -> {} failed: {}", from, to, e);
                    self.log.system(format!("Could not write the link: {e}"));
                }
            },
            (request, outcome) => {
                tracing::warn!("Host answered {:?} with {:?}", request, outcome);
            }
        }
    }

    // ========================================================================
    // Room text
    // ========================================================================

    /// Title shown for `room`.
    pub(crate) fn room_title(&self, room: &str) -> String {
        if is_void_room(room) {
            VOID_TITLE.to_string()
        } else if self.nav.is_unsealed(room) {
            self.graph
                .node(room)
                .map_or_else(|| room.to_string(), |node| node.name.clone())
        } else {
            SEALED_TITLE.to_string()
        }
    }

    /// `look`: the current room and its exits.
    pub(crate) fn describe_current(&mut self) {
        let Some(room) = self.nav.current_room().map(str::to_string) else {
            self.log.system("There is nothing here. The vault is empty.");
            return;
        };

        if is_void_room(&room) {
            self.log.narrate(format!("{VOID_TITLE}. {VOID_DESCRIPTION}"));
        } else if !self.nav.is_unsealed(&room) {
            self.log.narrate(SEALED_DESCRIPTION);
        } else if let Some(node) = self.graph.node(&room) {
            let mut text = node.name.clone();
            if let Some(excerpt) = &node.excerpt {
                text.push_str(&format!("\n{}", excerpt.trim()));
            }
            if !node.headings.is_empty() {
                text.push_str(&format!("\nSections: {}", node.headings.join(", ")));
            }
            if !node.directory.is_empty() {
                text.push_str(&format!("\nShelved in {}.", node.directory));
            }
            if node.word_count > 0 {
                text.push_str(&format!("\n{} words.", node.word_count));
            }
            self.log.narrate(text);
        }
        self.report_exits();
    }

    fn exits_line(&self) -> Option<String> {
        let layout = self.layout.as_ref()?;
        let index = layout.index_of(self.nav.current_room()?)?;
        let exits: Vec<String> = layout
            .passable(index)
            .directions()
            .map(|dir| {
                if layout.is_link_door(index, dir) {
                    format!("{dir} (link door)")
                } else {
                    dir.name().to_string()
                }
            })
            .collect();
        Some(if exits.is_empty() {
            "No exits.".to_string()
        } else {
            format!("Exits: {}.", exits.join(", "))
        })
    }

    fn report_exits(&mut self) {
        match self.exits_line() {
            Some(line) => self.log.system(line),
            None => self.log.system("There are no exits from nowhere."),
        }
    }

    fn report_position(&mut self) {
        let position = self.layout.as_ref().and_then(|layout| {
            let room = self.nav.current_room()?;
            Some((room.to_string(), layout.coord_of(room)?, layout.cell_count()))
        });
        match position {
            Some((room, (x, y), cells)) => {
                let title = self.room_title(&room);
                let seen = self.nav.discovered().len();
                self.log.system(format!(
                    "You are in {title} at ({x}, {y}). {seen} of {cells} cells discovered."
                ));
            }
            None => self.log.system("You are nowhere."),
        }
    }

    fn report_stats(&mut self) {
        let Some(layout) = &self.layout else {
            self.log.system("The vault is empty.");
            return;
        };
        let doors: u32 = layout.link_open_mask().iter().map(|p| p.count()).sum::<u32>() / 2;
        let history = self.nav.travel_history();
        let text = format!(
            "Documents: {}\nLinks: {}\nLink doors: {}\nGrid: {}x{}\nDiscovered: {}/{}\nUnsealed: {}\nHistory: {}/{}",
            self.graph.len(),
            self.graph.edge_count(),
            doors,
            layout.width(),
            layout.height(),
            self.nav.discovered().len(),
            layout.cell_count(),
            self.nav.inventory().len(),
            history.len(),
            history.cap(),
        );
        self.log.system(text);
    }

    fn report_inventory(&mut self) {
        if self.nav.inventory().is_empty() {
            self.log.system("Your satchel is empty.");
            return;
        }
        let mut text = String::from("You carry:");
        for room in self.nav.inventory() {
            text.push_str(&format!("\n- {}", self.room_title(room)));
        }
        self.log.system(text);
    }

    fn draw_map(&mut self, whole: bool) {
        let Some(layout) = &self.layout else {
            self.log.system("There is no map to draw.");
            return;
        };
        let current = self.nav.current_room().and_then(|room| layout.index_of(room));
        let window = match current {
            Some(index) if !whole => MapWindow::around(layout, index, self.config.map.local_radius),
            _ => MapWindow::full(layout),
        };
        let map = render_map(layout, &self.nav, window);
        if whole {
            self.viewport.fit(layout);
        }
        self.log.system(map);
    }

    // ========================================================================
    // Movement
    // ========================================================================

    fn walk(&mut self, dir: Direction) {
        let Some(layout) = &self.layout else {
            self.report_move(MoveOutcome::Unrooted);
            return;
        };
        let outcome = self.nav.move_by_direction(layout, dir);
        self.report_move(outcome);
    }

    fn go_back(&mut self) {
        let Some(layout) = &self.layout else {
            self.report_move(MoveOutcome::NoHistory);
            return;
        };
        let outcome = self.nav.go_back(layout);
        self.report_move(outcome);
    }

    fn teleport(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.log.system("Teleport where?");
            return;
        }
        let Some(layout) = &self.layout else {
            self.report_move(MoveOutcome::NoMatch);
            return;
        };
        let outcome = self
            .nav
            .teleport(layout, &self.graph, &self.tokens, query, self.config.search.limit);
        if outcome == MoveOutcome::NoMatch {
            self.log.system(format!("No room matches \"{}\".", query.trim()));
            return;
        }
        self.report_move(outcome);
    }

    fn report_move(&mut self, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { to, .. } => {
                if let Some(layout) = &self.layout {
                    self.viewport.center_on(layout, &to);
                }
                let title = self.room_title(&to);
                self.log.narrate(format!("You enter {title}."));
                self.report_exits();
            }
            MoveOutcome::AlreadyHere => self.log.system("You are already there."),
            MoveOutcome::Blocked(dir) => self.log.system(format!("You cannot go {dir}.")),
            MoveOutcome::Unrooted => self.log.system("There is nowhere to go."),
            MoveOutcome::NoHistory => self.log.system("There is no way back."),
            MoveOutcome::NoMatch => self.log.system("No room matches."),
            MoveOutcome::UnknownRoom => self.log.system("That room is not part of the maze."),
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.log.system("Search for what?");
            return;
        }
        let results = search_rooms(&self.graph, &self.tokens, query, self.config.search.limit);
        if results.is_empty() {
            self.log.system(format!("No results for \"{query}\"."));
            return;
        }

        let mut text = format!("Results for \"{query}\":");
        for (rank, hit) in results.iter().enumerate() {
            let label = self.search_label(&hit.id);
            let marker = if self.nav.is_discovered(&hit.id) { "" } else { " (unexplored)" };
            text.push_str(&format!("\n{}. {label}{marker}", rank + 1));
        }
        self.log.system(text);
    }

    /// Unsealed hits show their title. Sealed ones only give away where
    /// they lie, so `teleport` can still reach them by id or name.
    fn search_label(&self, room: &str) -> String {
        if self.nav.is_unsealed(room) {
            return self.room_title(room);
        }
        match self.layout.as_ref().and_then(|layout| layout.coord_of(room)) {
            Some((x, y)) => format!("Sealed folio at ({x}, {y})"),
            None => "Sealed folio".to_string(),
        }
    }

    // ========================================================================
    // Host round trips
    // ========================================================================

    fn begin_open(&mut self) -> Option<HostRequest> {
        let Some(room) = self.nav.current_room().map(str::to_string) else {
            self.log.system("There is nothing to open here.");
            return None;
        };
        if is_void_room(&room) {
            self.log.system("There is nothing here to open.");
            return None;
        }
        if self.nav.is_unsealed(&room) {
            let title = self.room_title(&room);
            self.log.system(format!("You have already unsealed {title}."));
            return None;
        }
        Some(HostRequest::ReadDocument { room })
    }

    fn finish_open(&mut self, room: &str, text: &str) {
        match self.nav.unseal(room) {
            UnsealOutcome::Unsealed | UnsealOutcome::AlreadyUnsealed => {
                let title = self.room_title(room);
                let first = first_line(text).unwrap_or("The pages are blank.");
                self.log.narrate(format!("You break the seal on {title}.\n{first}"));
            }
            UnsealOutcome::NotAllowed => {
                self.log.system(format!("{room} is no longer within reach."));
            }
        }
    }

    fn begin_link(&mut self, line: &str, query: &str) -> Option<HostRequest> {
        let Some(from) = self.nav.current_room().map(str::to_string) else {
            self.log.system("There is nowhere to write a link from.");
            return None;
        };
        if is_void_room(&from) {
            self.log.system("Links can only be written from a document room.");
            return None;
        }
        if query.trim().is_empty() {
            self.log.system("Link to what? Try `link <room>`.");
            return None;
        }

        let mut suggestions = LinkAutocomplete::new();
        suggestions.update(line, Some(&from), &self.graph, self.config.search.limit);
        let Some(to) = suggestions.selected_match().map(str::to_string) else {
            self.log.system(format!("No room to link matches \"{}\".", query.trim()));
            return None;
        };
        Some(HostRequest::CreateLink { from, to })
    }

    fn finish_link(&mut self, from: &str, to: &str) {
        if let Err(e) = self.graph.add_link(from, to) {
            tracing::warn!("Host created a link the graph cannot hold: {}", e);
            self.log.system(format!("Could not write the link: {e}"));
            return;
        }
        let from_title = self.room_title(from);
        let to_title = self.room_title(to);
        let mut text = format!("Ink flows from {from_title} towards {to_title}. A new link is written.");

        if let Some(layout) = self.layout.as_mut() {
            layout.update_link_openings(&self.graph);
            let door = layout.index_of(from).and_then(|index| {
                Direction::ALL.into_iter().find(|dir| {
                    layout.is_link_door(index, *dir)
                        && layout.neighbor(index, *dir).and_then(|n| layout.room_at(n)) == Some(to)
                })
            });
            if let Some(dir) = door {
                text.push_str(&format!("\nA door swings open to the {dir}."));
            }
        }
        self.log.narrate(text);
    }
}

/// First non-empty line of `text` with heading marks removed, shortened for
/// the log.
fn first_line(text: &str) -> Option<&str> {
    let line = text
        .lines()
        .map(|l| l.trim().trim_start_matches('#').trim())
        .find(|l| !l.is_empty() && *l != "---")?;
    Some(match line.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => &line[..cut],
        None => line,
    })
}
