//! Validation of descriptions using Validation.
//!
//! Every rule is checked and ALL violations are collected, so a broken
//! description is reported in one pass instead of one problem at a time.

use crate::loader::description::FsmDescription;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A way in which a description breaks the loader's contract.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DescriptionViolation {
    #[error("State '{name}' is defined more than once; only the first definition is kept")]
    DuplicateState { name: String },

    #[error("Initial state '{initial}' is not defined")]
    UnknownInitialState { initial: String },

    #[error("Action '{action}' of state '{state}' targets undefined state '{target}'")]
    DanglingTarget {
        state: String,
        action: String,
        target: String,
    },
}

/// What the loader does when a description has violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationStrategy {
    /// Refuse to load the description
    Reject,

    /// Log a warning per violation and load with first-definition-wins
    #[default]
    IgnoreAndLog,
}

type Check = Validation<(), NonEmptyVec<DescriptionViolation>>;

impl FsmDescription {
    /// Check the description, accumulating every violation.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<DescriptionViolation>> {
        let mut checks: Vec<Check> = vec![check_initial(self)];
        checks.extend(check_unique_names(self));
        checks.extend(check_targets(self));

        Validation::all_vec(checks).map(|_| ())
    }

    /// Every violation as a plain list, empty when the description is sound.
    pub fn violations(&self) -> Vec<DescriptionViolation> {
        match self.validate() {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}

fn check_initial(description: &FsmDescription) -> Check {
    if description.defines(&description.initial) {
        Validation::success(())
    } else {
        Validation::fail(DescriptionViolation::UnknownInitialState {
            initial: description.initial.clone(),
        })
    }
}

fn check_unique_names(description: &FsmDescription) -> Vec<Check> {
    let mut seen = HashSet::new();
    description
        .states
        .iter()
        .map(|state| {
            if seen.insert(state.name.as_str()) {
                Validation::success(())
            } else {
                Validation::fail(DescriptionViolation::DuplicateState {
                    name: state.name.clone(),
                })
            }
        })
        .collect()
}

fn check_targets(description: &FsmDescription) -> Vec<Check> {
    description
        .states
        .iter()
        .flat_map(|state| {
            state
                .transitions
                .iter()
                .flatten()
                .map(move |transition| (state, transition))
        })
        .map(|(state, transition)| {
            if description.defines(&transition.target) {
                Validation::success(())
            } else {
                Validation::fail(DescriptionViolation::DanglingTarget {
                    state: state.name.clone(),
                    action: transition.action.clone(),
                    target: transition.target.clone(),
                })
            }
        })
        .collect()
}
