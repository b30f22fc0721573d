//! Up-front checks of circuit libraries.
//!
//! Validation reports every problem emission would trip over, instead of
//! stopping at the first one.

use std::collections::HashSet;
use std::fmt::Display;

use arcstr::ArcStr;
use circuitlib::{
    BufferKind, CircuitLibrary, CircuitModel, ModelKind, Polarity, PortKind, TechBindings,
    TechModelKind, TechnologyLibrary, TechnologyModel,
};
use diagnostics::{Diagnostic, IssueSet, Severity};
use tracing::{span, Level};

use crate::ControlPort;

/// An issue identified during validation.
#[derive(Debug, Clone)]
pub struct ValidatorIssue {
    cause: Cause,
    severity: Severity,
}

/// The cause of a validation issue.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Cause {
    /// A model needing device-level synthesis has no technology binding.
    MissingTechBinding {
        /// The circuit model.
        model: ArcStr,
    },
    /// A model is bound to a technology model that is not a transistor.
    NotATransistor {
        /// The circuit model.
        model: ArcStr,
        /// The bound technology model.
        tech: ArcStr,
    },
    /// A transistor's width limits are not `0 < min <= max`.
    InvalidWidths {
        /// The technology model.
        tech: ArcStr,
        /// The offending polarity.
        polarity: Polarity,
        /// The minimum width.
        min_width: f64,
        /// The maximum width.
        max_width: f64,
    },
    /// A technology model's P/N ratio is not positive.
    InvalidPnRatio {
        /// The technology model.
        tech: ArcStr,
        /// The P/N ratio.
        pn_ratio: f64,
    },
    /// A model does not have exactly one non-global port of the given kind, of width 1.
    PortCount {
        /// The circuit model.
        model: ArcStr,
        /// The port kind.
        kind: PortKind,
        /// The widths of the matching ports.
        widths: Vec<usize>,
    },
    /// A multi-stage buffer has fewer than 2 stages.
    TooFewStages {
        /// The circuit model.
        model: ArcStr,
        /// The number of stages.
        num_levels: usize,
    },
    /// A buffer size is negative or not finite.
    InvalidSize {
        /// The circuit model.
        model: ArcStr,
        /// The size.
        size: f64,
    },
    /// A buffer growth factor is not positive.
    InvalidGrowthFactor {
        /// The circuit model.
        model: ArcStr,
        /// The growth factor.
        f_per_stage: f64,
    },
    /// A power-gated model lacks a control port.
    MissingControlPort {
        /// The circuit model.
        model: ArcStr,
        /// The missing port.
        port: ControlPort,
    },
    /// A bound model gets no device-level body.
    NoDeviceBody {
        /// The circuit model.
        model: ArcStr,
        /// The model kind.
        kind: ModelKind,
    },
}

impl ValidatorIssue {
    /// Creates a new validator issue.
    #[inline]
    pub fn new(cause: Cause, severity: Severity) -> Self {
        Self { cause, severity }
    }

    /// Creates a new validator issue and logs it immediately.
    ///
    /// The log level will be selected according to the given severity.
    pub(crate) fn new_and_log(cause: Cause, severity: Severity) -> Self {
        let result = Self::new(cause, severity);
        match severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?result.cause, "{}", result),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?result.cause, "{}", result),
            Severity::Error => tracing::event!(Level::ERROR, issue = ?result.cause, "{}", result),
        }
        result
    }

    /// The cause of this issue.
    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

}

impl Diagnostic for ValidatorIssue {
    fn severity(&self) -> Severity {
        self.severity
    }
}

impl Display for ValidatorIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cause)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTechBinding { model } => write!(
                f,
                "circuit model `{}` requires a technology binding but has none",
                model
            ),
            Self::NotATransistor { model, tech } => write!(
                f,
                "circuit model `{}` is bound to `{}`, which is not a transistor model",
                model, tech
            ),
            Self::InvalidWidths {
                tech,
                polarity,
                min_width,
                max_width,
            } => write!(
                f,
                "{} widths of technology model `{}` must satisfy 0 < min <= max, found min {} and max {}",
                polarity, tech, min_width, max_width
            ),
            Self::InvalidPnRatio { tech, pn_ratio } => write!(
                f,
                "technology model `{}` has non-positive P/N ratio {}",
                tech, pn_ratio
            ),
            Self::PortCount {
                model,
                kind,
                widths,
            } => write!(
                f,
                "circuit model `{}` must have exactly one {:?} port of width 1, found widths {:?}",
                model, kind, widths
            ),
            Self::TooFewStages { model, num_levels } => write!(
                f,
                "buffer `{}` must have at least 2 stages, found {}",
                model, num_levels
            ),
            Self::InvalidSize { model, size } => {
                write!(f, "circuit model `{}` has invalid buffer size {}", model, size)
            }
            Self::InvalidGrowthFactor { model, f_per_stage } => write!(
                f,
                "buffer `{}` has invalid per-stage growth factor {}",
                model, f_per_stage
            ),
            Self::MissingControlPort { model, port } => write!(
                f,
                "power-gated circuit model `{}` has no {} port",
                model, port
            ),
            Self::NoDeviceBody { model, kind } => write!(
                f,
                "no device-level netlist is generated for {:?} model `{}`",
                kind, model
            ),
        }
    }
}

/// Checks every circuit model that will be synthesized at the device level.
pub fn validate(
    circuit_lib: &CircuitLibrary,
    tech_lib: &TechnologyLibrary,
    bindings: &TechBindings,
) -> IssueSet<ValidatorIssue> {
    let _guard = span!(Level::INFO, "validating circuit library").entered();
    let mut issues = IssueSet::new();
    let mut checked_techs = HashSet::new();

    for (id, model) in circuit_lib.models() {
        if model.circuit_netlist().is_some() || !model.kind().needs_device_synthesis() {
            continue;
        }

        match bindings
            .get(id)
            .and_then(|t| tech_lib.try_model(t).map(|tech| (t, tech)))
        {
            None => issues.add(ValidatorIssue::new_and_log(
                Cause::MissingTechBinding {
                    model: model.name().clone(),
                },
                Severity::Error,
            )),
            Some((tech_id, tech)) => {
                if tech.kind() != TechModelKind::Transistor {
                    issues.add(ValidatorIssue::new_and_log(
                        Cause::NotATransistor {
                            model: model.name().clone(),
                            tech: tech.name().clone(),
                        },
                        Severity::Error,
                    ));
                } else if checked_techs.insert(tech_id) {
                    validate_tech(tech, &mut issues);
                }
            }
        }

        match model.kind() {
            ModelKind::InvBuf => validate_inv_buf(model, &mut issues),
            kind => issues.add(ValidatorIssue::new_and_log(
                Cause::NoDeviceBody {
                    model: model.name().clone(),
                    kind,
                },
                Severity::Info,
            )),
        }
    }

    issues
}

fn validate_tech(tech: &TechnologyModel, issues: &mut IssueSet<ValidatorIssue>) {
    for polarity in Polarity::ALL {
        let transistor = tech.transistor(polarity);
        if !(transistor.min_width > 0. && transistor.min_width <= transistor.max_width) {
            issues.add(ValidatorIssue::new_and_log(
                Cause::InvalidWidths {
                    tech: tech.name().clone(),
                    polarity,
                    min_width: transistor.min_width,
                    max_width: transistor.max_width,
                },
                Severity::Error,
            ));
        }
    }
    if !(tech.pn_ratio() > 0.) {
        issues.add(ValidatorIssue::new_and_log(
            Cause::InvalidPnRatio {
                tech: tech.name().clone(),
                pn_ratio: tech.pn_ratio(),
            },
            Severity::Error,
        ));
    }
}

fn validate_inv_buf(model: &CircuitModel, issues: &mut IssueSet<ValidatorIssue>) {
    for kind in [PortKind::Input, PortKind::Output] {
        let widths: Vec<_> = model.ports_by_kind(kind, true).map(|port| port.size).collect();
        if widths != [1] {
            issues.add(ValidatorIssue::new_and_log(
                Cause::PortCount {
                    model: model.name().clone(),
                    kind,
                    widths,
                },
                Severity::Error,
            ));
        }
    }

    let buffer = model.buffer();
    if !(buffer.size >= 0.) || !buffer.size.is_finite() {
        issues.add(ValidatorIssue::new_and_log(
            Cause::InvalidSize {
                model: model.name().clone(),
                size: buffer.size,
            },
            Severity::Error,
        ));
    }
    if buffer.kind == BufferKind::Buffer {
        if buffer.num_levels < 2 {
            issues.add(ValidatorIssue::new_and_log(
                Cause::TooFewStages {
                    model: model.name().clone(),
                    num_levels: buffer.num_levels,
                },
                Severity::Error,
            ));
        }
        if !(buffer.f_per_stage > 0.) || !buffer.f_per_stage.is_finite() {
            issues.add(ValidatorIssue::new_and_log(
                Cause::InvalidGrowthFactor {
                    model: model.name().clone(),
                    f_per_stage: buffer.f_per_stage,
                },
                Severity::Error,
            ));
        }
    }

    if model.is_power_gated() {
        let missing = [
            (model.power_gate_en_port(), ControlPort::Enable),
            (model.power_gate_enb_port(), ControlPort::EnableBar),
        ];
        for (_, port) in missing.into_iter().filter(|(found, _)| found.is_none()) {
            issues.add(ValidatorIssue::new_and_log(
                Cause::MissingControlPort {
                    model: model.name().clone(),
                    port,
                },
                Severity::Error,
            ));
        }
    }
}
