use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::buffered_eprintln;
use crate::config::Config;
use crate::design::DesignState;
use crate::scoring::{compare, rank_designs, Candidate, Comparison, RecommendPolicy};
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Configurator,
    Leaderboard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    Breakdown,
}

/// The decision row the cursor is on in the configurator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Field {
    Storage,
    Fulfilment,
    Automation,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Storage, Field::Fulfilment, Field::Automation];

    pub fn label(self) -> &'static str {
        match self {
            Field::Storage => "Storage model",
            Field::Fulfilment => "Fulfilment logic",
            Field::Automation => "Automation level",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Storage => Field::Fulfilment,
            Field::Fulfilment => Field::Automation,
            Field::Automation => Field::Storage,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Storage => Field::Automation,
            Field::Fulfilment => Field::Storage,
            Field::Automation => Field::Fulfilment,
        }
    }
}

pub struct App {
    pub human: Candidate,
    pub selected_field: Field,
    pub comparison: Option<Comparison>,
    pub thinking_since: Option<Instant>,
    pub thinking_delay: Duration,
    pub policy: RecommendPolicy,
    pub ranked: Vec<Candidate>,
    pub table_state: ratatui::widgets::TableState,
    pub current_view: View,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub spinner_frame: usize,
    pub colors: ThemeColors,
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl App {
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        design: DesignState,
        thinking_delay: Duration,
        colors: ThemeColors,
        verbose: bool,
    ) -> Self {
        let ranked = rank_designs();
        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(ranked.iter().position(|c| c.design == design));

        let mut app = Self {
            human: Candidate::evaluate(design),
            selected_field: Field::Storage,
            comparison: None,
            thinking_since: None,
            thinking_delay,
            policy: config.recommend_policy(),
            ranked,
            table_state,
            current_view: View::Configurator,
            input_mode: InputMode::Normal,
            flash_message: None,
            should_quit: false,
            spinner_frame: 0,
            colors,
            config,
            config_path,
            verbose,
        };
        app.start_thinking();
        app
    }

    pub fn design(&self) -> DesignState {
        self.human.design
    }

    pub fn is_thinking(&self) -> bool {
        self.thinking_since.is_some()
    }

    /// Replace the human design and restart the AI's answer
    pub fn set_design(&mut self, design: DesignState) {
        if design == self.human.design {
            return;
        }
        self.human = Candidate::evaluate(design);
        if self.verbose {
            buffered_eprintln!(
                "Design changed: {} (efficiency {:.2})",
                design,
                self.human.score()
            );
        }
        self.start_thinking();
    }

    /// Each change restarts the timer, so fast key presses only produce one answer.
    fn start_thinking(&mut self) {
        self.comparison = None;
        self.thinking_since = Some(Instant::now());
        self.poll_recommendation();
    }

    /// Reveal the recommendation once the thinking delay has elapsed.
    pub fn poll_recommendation(&mut self) {
        let Some(since) = self.thinking_since else {
            return;
        };
        if since.elapsed() < self.thinking_delay {
            return;
        }

        let comparison = compare(&self.human.design, self.policy);
        if self.verbose {
            buffered_eprintln!(
                "Recommendation: {} ({:?}, delta {:.2})",
                comparison.recommended.design,
                comparison.verdict,
                comparison.delta
            );
        }
        self.comparison = Some(comparison);
        self.thinking_since = None;
    }

    pub fn next_field(&mut self) {
        self.selected_field = self.selected_field.next();
    }

    pub fn previous_field(&mut self) {
        self.selected_field = self.selected_field.previous();
    }

    /// Cycle the option of the selected field forward or backward
    pub fn cycle_option(&mut self, forward: bool) {
        let mut design = self.human.design;
        match self.selected_field {
            Field::Storage => {
                design.storage_model = if forward {
                    design.storage_model.next()
                } else {
                    design.storage_model.previous()
                }
            }
            Field::Fulfilment => {
                design.fulfilment_logic = if forward {
                    design.fulfilment_logic.next()
                } else {
                    design.fulfilment_logic.previous()
                }
            }
            Field::Automation => {
                design.automation_level = if forward {
                    design.automation_level.next()
                } else {
                    design.automation_level.previous()
                }
            }
        }
        self.set_design(design);
    }

    /// Label of the currently chosen option for a field
    pub fn option_label(&self, field: Field) -> &'static str {
        let design = &self.human.design;
        match field {
            Field::Storage => design.storage_model.label(),
            Field::Fulfilment => design.fulfilment_logic.label(),
            Field::Automation => design.automation_level.label(),
        }
    }

    /// Labels of all options for a field, with the index of the chosen one
    pub fn option_labels(&self, field: Field) -> (Vec<&'static str>, usize) {
        let design = &self.human.design;
        match field {
            Field::Storage => (
                crate::design::StorageModel::ALL.iter().map(|o| o.label()).collect(),
                design.storage_model.index(),
            ),
            Field::Fulfilment => (
                crate::design::FulfilmentLogic::ALL.iter().map(|o| o.label()).collect(),
                design.fulfilment_logic.index(),
            ),
            Field::Automation => (
                crate::design::AutomationLevel::ALL.iter().map(|o| o.label()).collect(),
                design.automation_level.index(),
            ),
        }
    }

    /// Take over the AI's design as the human design
    pub fn adopt_recommendation(&mut self) {
        let recommended = match &self.comparison {
            Some(c) => c.recommended.design,
            None => {
                self.show_flash("Still thinking...".to_string());
                return;
            }
        };
        if recommended == self.human.design {
            self.show_flash("Already using this design".to_string());
            return;
        }
        self.set_design(recommended);
        self.show_flash(format!("Adopted: {}", recommended));
    }

    /// Write the current design into the config file
    pub fn save_design(&mut self) {
        let path = match &self.config_path {
            Some(p) => p.clone(),
            None => match crate::config::get_config_path() {
                Ok(p) => p,
                Err(e) => {
                    self.show_flash(format!("Failed to save design: {}", e));
                    return;
                }
            },
        };

        self.config.design = Some(self.human.design);
        match crate::config::save_config(&path, &self.config) {
            Ok(()) => self.show_flash(format!("Saved design to {}", path.display())),
            Err(e) => self.show_flash(format!("Failed to save design: {}", e)),
        }
    }

    pub fn next_row(&mut self) {
        if self.ranked.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < self.ranked.len() => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        if self.ranked.is_empty() {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => self.ranked.len() - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Load the highlighted leaderboard design into the configurator
    pub fn pick_selected_row(&mut self) {
        let picked = self
            .table_state
            .selected()
            .and_then(|i| self.ranked.get(i))
            .map(|c| c.design);
        if let Some(design) = picked {
            self.set_design(design);
            self.current_view = View::Configurator;
            self.show_flash(format!("Loaded: {}", design));
        }
    }

    pub fn toggle_view(&mut self) {
        self.current_view = match self.current_view {
            View::Configurator => View::Leaderboard,
            View::Leaderboard => View::Configurator,
        };
        if self.current_view == View::Leaderboard {
            let position = self.ranked.iter().position(|c| c.design == self.human.design);
            self.table_state.select(position);
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_breakdown(&mut self) {
        self.input_mode = InputMode::Breakdown;
    }

    pub fn dismiss_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Advance the thinking spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{AutomationLevel, FulfilmentLogic, StorageModel};
    use crate::scoring::Verdict;

    fn instant_app() -> App {
        App::new(
            Config::default(),
            None,
            DesignState::default(),
            Duration::ZERO,
            ThemeColors::dark(),
            false,
        )
    }

    fn slow_app() -> App {
        App::new(
            Config::default(),
            None,
            DesignState::default(),
            Duration::from_secs(3600),
            ThemeColors::dark(),
            false,
        )
    }

    #[test]
    fn test_zero_delay_answers_immediately() {
        let app = instant_app();
        assert!(!app.is_thinking());
        let comparison = app.comparison.unwrap();
        assert_eq!(comparison.verdict, Verdict::Improved);
        assert_eq!(comparison.human.design, DesignState::default());
    }

    #[test]
    fn test_delay_holds_answer_back() {
        let mut app = slow_app();
        assert!(app.is_thinking());
        assert!(app.comparison.is_none());
        app.poll_recommendation();
        assert!(app.comparison.is_none());
    }

    #[test]
    fn test_change_restarts_thinking() {
        let mut app = slow_app();
        app.thinking_delay = Duration::ZERO;
        app.poll_recommendation();
        assert!(app.comparison.is_some());

        app.thinking_delay = Duration::from_secs(3600);
        app.cycle_option(true);
        assert!(app.is_thinking());
        assert!(app.comparison.is_none());
    }

    #[test]
    fn test_cycle_option_on_selected_field() {
        let mut app = instant_app();
        app.cycle_option(true);
        assert_eq!(app.design().storage_model, StorageModel::HighDensity);

        app.next_field();
        app.cycle_option(false);
        assert_eq!(app.design().fulfilment_logic, FulfilmentLogic::Wave);

        app.next_field();
        app.cycle_option(true);
        assert_eq!(app.design().automation_level, AutomationLevel::MechanizationHeavy);
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut app = instant_app();
        app.previous_field();
        assert_eq!(app.selected_field, Field::Automation);
        app.next_field();
        assert_eq!(app.selected_field, Field::Storage);
    }

    #[test]
    fn test_human_metrics_follow_design() {
        let mut app = instant_app();
        app.cycle_option(true);
        assert_eq!(
            app.human,
            Candidate::evaluate(DesignState::new(
                StorageModel::HighDensity,
                FulfilmentLogic::ContinuousFlow,
                AutomationLevel::SelectiveAutomation
            ))
        );
    }

    #[test]
    fn test_adopt_recommendation() {
        let mut app = instant_app();
        app.adopt_recommendation();
        assert_eq!(
            app.design(),
            DesignState::new(
                StorageModel::HighAccessibility,
                FulfilmentLogic::ContinuousFlow,
                AutomationLevel::MechanizationHeavy
            )
        );
        assert_eq!(app.comparison.unwrap().verdict, Verdict::Optimal);

        // Adopting again is a no-op
        app.adopt_recommendation();
        let (msg, _) = app.flash_message.clone().unwrap();
        assert_eq!(msg, "Already using this design");
    }

    #[test]
    fn test_adopt_while_thinking() {
        let mut app = slow_app();
        app.adopt_recommendation();
        assert_eq!(app.design(), DesignState::default());
        let (msg, _) = app.flash_message.clone().unwrap();
        assert_eq!(msg, "Still thinking...");
    }

    #[test]
    fn test_leaderboard_selects_human_row() {
        let mut app = instant_app();
        app.toggle_view();
        assert_eq!(app.current_view, View::Leaderboard);
        assert_eq!(app.table_state.selected(), Some(4));
    }

    #[test]
    fn test_row_navigation_wraps() {
        let mut app = instant_app();
        app.table_state.select(Some(26));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(26));
    }

    #[test]
    fn test_pick_selected_row_loads_design() {
        let mut app = instant_app();
        app.toggle_view();
        app.table_state.select(Some(0));
        app.pick_selected_row();
        assert_eq!(app.current_view, View::Configurator);
        assert_eq!(app.design(), app.ranked[0].design);
    }

    #[test]
    fn test_option_labels() {
        let app = instant_app();
        let (labels, selected) = app.option_labels(Field::Fulfilment);
        assert_eq!(labels, vec!["Wave", "Continuous Flow", "Batch"]);
        assert_eq!(selected, 1);
        assert_eq!(app.option_label(Field::Automation), "Selective Automation");
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config {
            recommend_policy: Some(RecommendPolicy::StrictImprovement),
            ..Config::default()
        };
        let app = App::new(
            config,
            None,
            DesignState::default(),
            Duration::ZERO,
            ThemeColors::dark(),
            false,
        );
        assert_eq!(app.policy, RecommendPolicy::StrictImprovement);
    }

    #[test]
    fn test_save_design_writes_config() {
        let temp_path = std::env::temp_dir()
            .join("wh_design_test_tui_save")
            .join("config.yaml");
        let _ = std::fs::remove_file(&temp_path);

        let mut app = instant_app();
        app.config_path = Some(temp_path.clone());
        app.cycle_option(true);
        app.save_design();

        let loaded = crate::config::load_config(Some(temp_path.clone())).unwrap();
        assert_eq!(loaded.design(), app.design());

        let _ = std::fs::remove_file(&temp_path);
    }
}
