use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use shared::{ChoiceList, ListChange, SpinConfiguration, SpinPhase, SpinState, SpinTicket, WheelSelector};
use crate::commands::{help_text, Command};
use crate::config::{Config, Preset};
use crate::error::CliError;

/// What the event loop should do after a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Spinning(SpinTicket),
    Quit,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    list: &'a ChoiceList,
    spin: &'a SpinState,
    can_spin: bool,
    config: &'a SpinConfiguration,
}

/// Owns the list and the wheel for one terminal session. Every call comes
/// from the single event loop, so nothing here is shared.
pub struct Session<R = StdRng> {
    list: ChoiceList,
    spin: SpinState,
    selector: WheelSelector<R>,
    config: SpinConfiguration,
}

impl Session<StdRng> {
    pub fn from_config(config: &Config) -> Self {
        let list = match config.preset {
            Preset::Default => ChoiceList::with_default_preset(),
            Preset::Empty => ChoiceList::new(),
        };
        let selector = match config.seed {
            Some(seed) => WheelSelector::seeded(seed),
            None => WheelSelector::new(),
        };
        Self::new(list, selector.with_resolve_delay(config.resolve_delay), config.spin)
    }
}

impl<R: Rng> Session<R> {
    pub fn new(list: ChoiceList, selector: WheelSelector<R>, config: SpinConfiguration) -> Self {
        Self {
            list,
            spin: SpinState::new(),
            selector,
            config,
        }
    }

    pub fn list(&self) -> &ChoiceList {
        &self.list
    }

    pub fn spin_state(&self) -> &SpinState {
        &self.spin
    }

    pub fn execute(&mut self, line: &str) -> Result<Reply, CliError> {
        let command: Command = line.parse()?;
        self.handle(command)
    }

    pub fn handle(&mut self, command: Command) -> Result<Reply, CliError> {
        let reply = match command {
            Command::Add { active, label } => {
                if !self.list.can_add(&self.config) {
                    tracing::warn!(
                        count = self.list.len(),
                        max = self.config.max_selectable(),
                        "Adding past the spin limit"
                    );
                }
                let id = self.list.add(active);
                if let Some(label) = label {
                    self.list.set_label(id, label);
                    self.list.commit_edit(id);
                }
                Reply::Text(self.render())
            }
            Command::Label { position, text } => {
                let change = match self.list.id_at(position) {
                    Some(id) => self.list.set_label(id, text),
                    None => ListChange::Unchanged,
                };
                self.after_change(change)
            }
            Command::Toggle(position) => {
                let change = match self.list.id_at(position) {
                    Some(id) => self.list.toggle_active(id),
                    None => ListChange::Unchanged,
                };
                self.after_change(change)
            }
            Command::Done(position) => {
                let change = match self.list.id_at(position) {
                    Some(id) => self.list.commit_edit(id),
                    None => ListChange::Unchanged,
                };
                self.after_change(change)
            }
            Command::Remove(position) => {
                let change = self.list.remove_at(position);
                self.after_change(change)
            }
            Command::List => Reply::Text(self.render()),
            Command::Json => Reply::Text(self.snapshot_json()?),
            Command::Spin => self.start_spin()?,
            Command::Cancel => {
                if self.spin.is_spinning() {
                    self.spin.cancel_spin();
                    Reply::Text("Spin cancelled.".to_string())
                } else {
                    Reply::Text("Nothing is spinning.".to_string())
                }
            }
            Command::Help => Reply::Text(help_text()),
            Command::Quit => {
                self.spin.cancel_spin();
                Reply::Quit
            }
        };
        Ok(reply)
    }

    /// Called by the event loop when a ticket's delay has elapsed. Returns
    /// the announcement, or `None` when the ticket was superseded.
    pub fn finish_spin(&mut self, generation: u64) -> Result<Option<String>, CliError> {
        Ok(self
            .spin
            .complete_spin(generation)?
            .map(|winner| format!("🎉 Landed on: {}", winner)))
    }

    fn start_spin(&mut self) -> Result<Reply, CliError> {
        if !self.list.can_spin(&self.config) {
            return Ok(Reply::Text(format!(
                "Put between {} and {} named options in play to spin.",
                self.config.min_selectable(),
                self.config.max_selectable()
            )));
        }
        let ticket = self.spin.start_spin(&mut self.selector, self.list.active_labels())?;
        Ok(Reply::Spinning(ticket))
    }

    fn after_change(&self, change: ListChange) -> Reply {
        match change {
            ListChange::Unchanged => Reply::Text("No option at that position.".to_string()),
            change => {
                tracing::debug!("{:?}", change);
                Reply::Text(self.render())
            }
        }
    }

    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.list.len() + 2);
        if self.list.is_empty() {
            lines.push("  (no options yet, try 'add + Pizza')".to_string());
        }
        for (index, entry) in self.list.entries().iter().enumerate() {
            let mark = if entry.is_active() { "x" } else { " " };
            let label = if entry.label().is_empty() { "<unnamed>" } else { entry.label() };
            lines.push(format!("  {:>2}. [{}] {}", index + 1, mark, label));
        }
        let status = match self.spin.phase() {
            SpinPhase::Spinning => "spinning...".to_string(),
            SpinPhase::Resolved => format!("last pick: {}", self.spin.result().unwrap_or("-")),
            SpinPhase::Idle if self.list.can_spin(&self.config) => "ready to spin".to_string(),
            SpinPhase::Idle => "not ready".to_string(),
        };
        lines.push(format!(
            "  {} in play, {}",
            self.list.active_count(),
            status
        ));
        lines.join("\n")
    }

    pub fn snapshot_json(&self) -> Result<String, CliError> {
        let snapshot = Snapshot {
            list: &self.list,
            spin: &self.spin,
            can_spin: self.list.can_spin(&self.config),
            config: &self.config,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}
