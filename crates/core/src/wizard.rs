//! Client shell: state → crop → query → results.
//!
//! The wizard only moves forward through successful steps. Going back is
//! allowed from the crop and query screens, and the results screen returns to
//! the start through [`Wizard::new_search`].

use crate::client::RecommendationApi;
use crate::domain::contract::RecommendationQuery;
use crate::domain::recommendation::Recommendation;
use std::fmt;

pub const SUBMIT_FAILED_NOTICE: &str = "Failed to get recommendation. Please try again.";

#[derive(Debug, PartialEq, Eq)]
pub struct StateOption {
    pub id: &'static str,
    pub name: &'static str,
    pub crops: &'static [CropOption],
}

#[derive(Debug, PartialEq, Eq)]
pub struct CropOption {
    pub id: &'static str,
    pub name: &'static str,
}

static STATES: &[StateOption] = &[
    StateOption {
        id: "maharashtra",
        name: "Maharashtra",
        crops: &[
            CropOption { id: "cotton", name: "Cotton" },
            CropOption { id: "soybean", name: "Soybean" },
            CropOption { id: "wheat", name: "Wheat" },
            CropOption { id: "onion", name: "Onion" },
        ],
    },
    StateOption {
        id: "karnataka",
        name: "Karnataka",
        crops: &[
            CropOption { id: "rice", name: "Rice" },
            CropOption { id: "ragi", name: "Ragi" },
            CropOption { id: "sugarcane", name: "Sugarcane" },
        ],
    },
    StateOption {
        id: "rajasthan",
        name: "Rajasthan",
        crops: &[
            CropOption { id: "wheat", name: "Wheat" },
            CropOption { id: "mustard", name: "Mustard" },
            CropOption { id: "bajra", name: "Bajra" },
        ],
    },
    StateOption {
        id: "punjab",
        name: "Punjab",
        crops: &[
            CropOption { id: "wheat", name: "Wheat" },
            CropOption { id: "rice", name: "Rice" },
            CropOption { id: "maize", name: "Maize" },
        ],
    },
    StateOption {
        id: "uttar-pradesh",
        name: "Uttar Pradesh",
        crops: &[
            CropOption { id: "wheat", name: "Wheat" },
            CropOption { id: "rice", name: "Rice" },
            CropOption { id: "sugarcane", name: "Sugarcane" },
        ],
    },
];

pub fn states() -> &'static [StateOption] {
    STATES
}

pub fn find_state(id: &str) -> Option<&'static StateOption> {
    STATES.iter().find(|s| s.id == id)
}

impl StateOption {
    pub fn find_crop(&self, id: &str) -> Option<&'static CropOption> {
        self.crops.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectingState,
    SelectingCrop,
    EnteringQuery,
    ShowingResults,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::SelectingState => "selecting state",
            Step::SelectingCrop => "selecting crop",
            Step::EnteringQuery => "entering query",
            Step::ShowingResults => "showing results",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardError {
    UnknownState(String),
    CropNotGrown { state: &'static str, crop: String },
    InvalidTransition { step: Step, action: &'static str },
    BlankLocation,
    InvalidQuantity(f64),
    SubmitInFlight,
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardError::UnknownState(id) => write!(f, "unknown state: {id:?}"),
            WizardError::CropNotGrown { state, crop } => {
                write!(f, "crop {crop:?} is not offered for state {state:?}")
            }
            WizardError::InvalidTransition { step, action } => {
                write!(f, "cannot {action} while {step}")
            }
            WizardError::BlankLocation => f.write_str("location is required"),
            WizardError::InvalidQuantity(q) => {
                write!(f, "quantity must be at least 1 quintal (got {q})")
            }
            WizardError::SubmitInFlight => f.write_str("a request is already in progress"),
        }
    }
}

impl std::error::Error for WizardError {}

#[derive(Debug, Clone)]
enum Screen {
    SelectingState,
    SelectingCrop {
        state: &'static StateOption,
    },
    EnteringQuery {
        state: &'static StateOption,
        crop: &'static CropOption,
        submitting: bool,
        notice: Option<String>,
    },
    ShowingResults {
        state: &'static StateOption,
        crop: &'static CropOption,
        recommendation: Box<Recommendation>,
    },
}

#[derive(Debug, Clone)]
pub struct Wizard {
    screen: Screen,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            screen: Screen::SelectingState,
        }
    }

    pub fn step(&self) -> Step {
        match self.screen {
            Screen::SelectingState => Step::SelectingState,
            Screen::SelectingCrop { .. } => Step::SelectingCrop,
            Screen::EnteringQuery { .. } => Step::EnteringQuery,
            Screen::ShowingResults { .. } => Step::ShowingResults,
        }
    }

    pub fn selected_state(&self) -> Option<&'static StateOption> {
        match self.screen {
            Screen::SelectingState => None,
            Screen::SelectingCrop { state }
            | Screen::EnteringQuery { state, .. }
            | Screen::ShowingResults { state, .. } => Some(state),
        }
    }

    pub fn selected_crop(&self) -> Option<&'static CropOption> {
        match self.screen {
            Screen::EnteringQuery { crop, .. } | Screen::ShowingResults { crop, .. } => Some(crop),
            _ => None,
        }
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match &self.screen {
            Screen::ShowingResults { recommendation, .. } => Some(&**recommendation),
            _ => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match &self.screen {
            Screen::EnteringQuery { notice, .. } => notice.as_deref(),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self.screen,
            Screen::EnteringQuery {
                submitting: true,
                ..
            }
        )
    }

    pub fn select_state(&mut self, id: &str) -> Result<(), WizardError> {
        let Screen::SelectingState = self.screen else {
            return Err(self.invalid("select a state"));
        };
        let state = find_state(id).ok_or_else(|| WizardError::UnknownState(id.to_string()))?;
        self.screen = Screen::SelectingCrop { state };
        Ok(())
    }

    pub fn select_crop(&mut self, id: &str) -> Result<(), WizardError> {
        let Screen::SelectingCrop { state } = self.screen else {
            return Err(self.invalid("select a crop"));
        };
        let crop = state.find_crop(id).ok_or_else(|| WizardError::CropNotGrown {
            state: state.id,
            crop: id.to_string(),
        })?;
        self.screen = Screen::EnteringQuery {
            state,
            crop,
            submitting: false,
            notice: None,
        };
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.screen = match self.screen {
            Screen::SelectingCrop { .. } => Screen::SelectingState,
            Screen::EnteringQuery {
                submitting: true, ..
            } => return Err(WizardError::SubmitInFlight),
            Screen::EnteringQuery { state, .. } => Screen::SelectingCrop { state },
            _ => return Err(self.invalid("go back")),
        };
        Ok(())
    }

    pub fn new_search(&mut self) -> Result<(), WizardError> {
        let Screen::ShowingResults { .. } = self.screen else {
            return Err(self.invalid("start a new search"));
        };
        self.screen = Screen::SelectingState;
        Ok(())
    }

    /// Validates the form and marks the query screen as submitting.
    /// Every successful call must be paired with [`Wizard::finish_submit`].
    pub fn begin_submit(
        &mut self,
        location: &str,
        quantity: f64,
    ) -> Result<RecommendationQuery, WizardError> {
        let step = self.step();
        let Screen::EnteringQuery {
            state,
            crop,
            submitting,
            notice,
        } = &mut self.screen
        else {
            return Err(WizardError::InvalidTransition {
                step,
                action: "submit a query",
            });
        };
        if *submitting {
            return Err(WizardError::SubmitInFlight);
        }

        let location = location.trim();
        if location.is_empty() {
            return Err(WizardError::BlankLocation);
        }
        if !quantity.is_finite() || quantity < 1.0 {
            return Err(WizardError::InvalidQuantity(quantity));
        }

        *submitting = true;
        *notice = None;
        Ok(RecommendationQuery {
            state: state.id.to_string(),
            crop: crop.id.to_string(),
            location: location.to_string(),
            quantity: Some(quantity),
        })
    }

    pub fn finish_submit(
        &mut self,
        result: anyhow::Result<Recommendation>,
    ) -> Result<(), WizardError> {
        let Screen::EnteringQuery {
            state,
            crop,
            submitting: true,
            ..
        } = self.screen
        else {
            return Err(self.invalid("finish a submission"));
        };

        self.screen = match result {
            Ok(recommendation) => Screen::ShowingResults {
                state,
                crop,
                recommendation: Box::new(recommendation),
            },
            Err(err) => {
                tracing::warn!(
                    error = %format!("{err:#}"),
                    state = state.id,
                    crop = crop.id,
                    "recommendation request failed"
                );
                Screen::EnteringQuery {
                    state,
                    crop,
                    submitting: false,
                    notice: Some(SUBMIT_FAILED_NOTICE.to_string()),
                }
            }
        };
        Ok(())
    }

    /// Runs one full submission against `api`. A service failure is not an
    /// error here; it leaves the wizard on the query screen with a notice.
    pub async fn submit(
        &mut self,
        api: &dyn RecommendationApi,
        location: &str,
        quantity: f64,
    ) -> Result<(), WizardError> {
        let query = self.begin_submit(location, quantity)?;
        let result = api.recommend(&query).await;
        self.finish_submit(result)
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            step: self.step(),
            action,
        }
    }
}
