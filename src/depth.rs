//! Search depth and node budgets derived from the skill level.
//!
//! It is assumed in reading a ladder if the reading stack reaches `depth`
//! that as soon as a bounding stone is in atari, the string is safe. The
//! other depths implement similar simplifying assumptions deeper in the
//! tree. Any such scheme invites the horizon effect: raising the depths
//! makes the engine stronger and slower.
//!
//! [`DepthParams::compute`] turns a level into a full parameter set;
//! [`DepthParams::apply_delta`] temporarily shifts the horizon-sensitive
//! depths. [`DepthBudget`] bundles the level, the manual overrides and the
//! current parameters into the context handed to the reading code.

use std::fmt;
use std::str::FromStr;

use crate::constants::*;

/// Names of every budget parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    Depth,
    BranchDepth,
    BackfillDepth,
    Backfill2Depth,
    BreakChainDepth,
    OwlDistrustDepth,
    OwlBranchDepth,
    OwlReadingDepth,
    AaDepth,
    KoDepth,
    FourlibDepth,
    SuperstringDepth,
    OwlNodeLimit,
    SemeaiBranchDepth,
    SemeaiBranchDepth2,
    SemeaiNodeLimit,
    ConnectDepth,
    ConnectDepth2,
    ConnectionNodeLimit,
    BreakinDepth,
    BreakinNodeLimit,
}

impl Param {
    /// Every parameter, in report order.
    pub const ALL: [Param; 21] = [
        Param::Depth,
        Param::BranchDepth,
        Param::BackfillDepth,
        Param::Backfill2Depth,
        Param::BreakChainDepth,
        Param::OwlDistrustDepth,
        Param::OwlBranchDepth,
        Param::OwlReadingDepth,
        Param::AaDepth,
        Param::KoDepth,
        Param::FourlibDepth,
        Param::SuperstringDepth,
        Param::OwlNodeLimit,
        Param::SemeaiBranchDepth,
        Param::SemeaiBranchDepth2,
        Param::SemeaiNodeLimit,
        Param::ConnectDepth,
        Param::ConnectDepth2,
        Param::ConnectionNodeLimit,
        Param::BreakinDepth,
        Param::BreakinNodeLimit,
    ];

    /// The parameters moved by [`DepthParams::apply_delta`].
    pub const HORIZON: [Param; 9] = [
        Param::Depth,
        Param::BackfillDepth,
        Param::Backfill2Depth,
        Param::BreakChainDepth,
        Param::SuperstringDepth,
        Param::BranchDepth,
        Param::FourlibDepth,
        Param::KoDepth,
        Param::BreakinDepth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::Depth => "depth",
            Param::BranchDepth => "branch_depth",
            Param::BackfillDepth => "backfill_depth",
            Param::Backfill2Depth => "backfill2_depth",
            Param::BreakChainDepth => "break_chain_depth",
            Param::OwlDistrustDepth => "owl_distrust_depth",
            Param::OwlBranchDepth => "owl_branch_depth",
            Param::OwlReadingDepth => "owl_reading_depth",
            Param::AaDepth => "aa_depth",
            Param::KoDepth => "ko_depth",
            Param::FourlibDepth => "fourlib_depth",
            Param::SuperstringDepth => "superstring_depth",
            Param::OwlNodeLimit => "owl_node_limit",
            Param::SemeaiBranchDepth => "semeai_branch_depth",
            Param::SemeaiBranchDepth2 => "semeai_branch_depth2",
            Param::SemeaiNodeLimit => "semeai_node_limit",
            Param::ConnectDepth => "connect_depth",
            Param::ConnectDepth2 => "connect_depth2",
            Param::ConnectionNodeLimit => "connection_node_limit",
            Param::BreakinDepth => "breakin_depth",
            Param::BreakinNodeLimit => "breakin_node_limit",
        }
    }

    /// Smallest value the parameter can take after a recompute.
    pub fn floor(self) -> i32 {
        match self {
            Param::Depth => 6,
            Param::BranchDepth => 3,
            Param::BackfillDepth
            | Param::BreakChainDepth
            | Param::OwlBranchDepth
            | Param::SemeaiBranchDepth
            | Param::SemeaiBranchDepth2
            | Param::ConnectDepth
            | Param::ConnectDepth2
            | Param::BreakinDepth => 2,
            Param::Backfill2Depth
            | Param::OwlDistrustDepth
            | Param::KoDepth
            | Param::FourlibDepth => 1,
            Param::OwlReadingDepth => 5,
            Param::OwlNodeLimit => 20,
            Param::AaDepth
            | Param::SuperstringDepth
            | Param::SemeaiNodeLimit
            | Param::ConnectionNodeLimit
            | Param::BreakinNodeLimit => 0,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure to read a parameter name or a `name=value` override.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown depth parameter '{0}'")]
    UnknownParam(String),
    #[error("expected name=value, got '{0}'")]
    MissingValue(String),
    #[error("invalid value '{value}' for {param}")]
    InvalidValue { param: Param, value: String },
}

impl FromStr for Param {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Param::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParamError::UnknownParam(s.to_string()))
    }
}

/// One manual assignment, as given on the command line: `depth=20`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub param: Param,
    /// New value, or `UNSET` to remove an override.
    pub value: i32,
}

impl FromStr for Assignment {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| ParamError::MissingValue(s.to_string()))?;
        let param: Param = name.parse()?;
        let value = value
            .trim()
            .parse()
            .map_err(|_| ParamError::InvalidValue {
                param,
                value: value.to_string(),
            })?;
        Ok(Assignment { param, value })
    }
}

/// Sentinel for "no override".
pub const UNSET: i32 = -1;

/// Fixed values that replace computed parameters. Survive recomputation
/// until cleared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    values: [Option<i32>; Param::ALL.len()],
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override. `UNSET` (or any negative value) clears it.
    pub fn set(&mut self, param: Param, value: i32) {
        self.values[param as usize] = (value >= 0).then_some(value);
    }

    pub fn clear(&mut self, param: Param) {
        self.values[param as usize] = None;
    }

    pub fn clear_all(&mut self) {
        self.values = Default::default();
    }

    pub fn get(&self, param: Param) -> Option<i32> {
        self.values[param as usize]
    }

    pub fn apply(&mut self, assignment: Assignment) {
        self.set(assignment.param, assignment.value);
    }

    /// Active overrides in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Param, i32)> + '_ {
        Param::ALL
            .into_iter()
            .filter_map(|p| self.get(p).map(|v| (p, v)))
    }
}

/// Computes `a * b^e`, saturating at `i32::MAX`.
fn exponential_level(a: i32, b: f64, e: i32) -> i32 {
    let x = b.powf(e as f64);
    if x > i32::MAX as f64 / a as f64 {
        return i32::MAX;
    }
    (a as f64 * x) as i32
}

/// Narrow an intermediate value; extreme levels only ever push a
/// parameter further past its floor or towards saturation.
fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Correction to the level-10 defaults shared by most depths.
///
/// Levels 8/9 and 9/10 differ by switching services off rather than by
/// depth, so they share depth corrections with their neighbours.
pub fn depth_level(level: i32) -> i32 {
    match level {
        l if l >= 10 => l - 10,
        9 => 0,
        8 => -1,
        l => l.saturating_sub(8),
    }
}

/// The reading budgets consumed by the tactical, owl, semeai, connection
/// and break-in searches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthParams {
    pub depth: i32,
    pub branch_depth: i32,
    pub backfill_depth: i32,
    pub backfill2_depth: i32,
    pub break_chain_depth: i32,
    pub owl_distrust_depth: i32,
    pub owl_branch_depth: i32,
    pub owl_reading_depth: i32,
    pub aa_depth: i32,
    pub ko_depth: i32,
    pub fourlib_depth: i32,
    pub superstring_depth: i32,
    pub owl_node_limit: i32,
    pub semeai_branch_depth: i32,
    pub semeai_branch_depth2: i32,
    pub semeai_node_limit: i32,
    pub connect_depth: i32,
    pub connect_depth2: i32,
    pub connection_node_limit: i32,
    pub breakin_depth: i32,
    pub breakin_node_limit: i32,
    /// Running total of `apply_delta` since the last recompute.
    offset: i32,
}

impl DepthParams {
    /// Derive every parameter from `level`, then apply `overrides`.
    pub fn compute(level: i32, overrides: &Overrides) -> Self {
        let dl = depth_level(level);
        let d = i64::from(dl);
        let l = i64::from(level);

        // Follows the level directly, one step per level.
        let linear = |base: i32| saturate(i64::from(base) + d);
        // Half a step per level.
        let halved = |base: i32| saturate((2 * i64::from(base) + d) / 2);
        // Two steps per level.
        let doubled = |base: i32| saturate(i64::from(base) + 2 * d);

        let owl_distrust_depth = if level >= 8 {
            halved(OWL_DISTRUST_DEPTH)
        } else {
            saturate((2 * i64::from(OWL_DISTRUST_DEPTH) - 1 + d) / 2)
        };

        // Atari-atari and ko depths are unchanged only between levels 7/8 and 9/10.
        let aa_depth = saturate(match level {
            10.. => i64::from(AA_DEPTH) + (l - 10),
            9 => i64::from(AA_DEPTH),
            7 | 8 => i64::from(AA_DEPTH) - 1,
            _ => i64::from(AA_DEPTH) - (8 - l),
        });
        let ko_depth = saturate(match level {
            10.. => i64::from(KO_DEPTH) + (l - 10),
            9 => i64::from(KO_DEPTH),
            7 | 8 => i64::from(KO_DEPTH) - 1,
            _ => i64::from(KO_DEPTH) + (l - 8),
        });
        // Constant from levels 7 to 10.
        let fourlib_depth = saturate(match level {
            10.. => i64::from(FOURLIB_DEPTH) + (l - 10),
            7..=9 => i64::from(FOURLIB_DEPTH),
            _ => i64::from(FOURLIB_DEPTH) + (l - 7),
        });
        // Superstring reading is switched off below level 8.
        let superstring_depth = if level >= 8 { SUPERSTRING_DEPTH } else { 0 };

        let owl_node_limit = if level >= 10 {
            exponential_level(OWL_NODE_LIMIT, 1.5, dl)
        } else {
            let idx = (10 - l).min(OWL_NODE_LIMITS.len() as i64 - 1) as usize;
            OWL_NODE_LIMIT * OWL_NODE_LIMITS[idx] / OWL_NODE_LIMITS[0]
        };

        let mut params = DepthParams {
            depth: linear(DEPTH),
            branch_depth: linear(BRANCH_DEPTH),
            backfill_depth: linear(BACKFILL_DEPTH),
            backfill2_depth: linear(BACKFILL2_DEPTH),
            break_chain_depth: linear(BREAK_CHAIN_DEPTH),
            owl_distrust_depth,
            owl_branch_depth: halved(OWL_BRANCH_DEPTH),
            owl_reading_depth: halved(OWL_READING_DEPTH),
            aa_depth,
            ko_depth,
            fourlib_depth,
            superstring_depth,
            owl_node_limit,
            semeai_branch_depth: halved(SEMEAI_BRANCH_DEPTH),
            semeai_branch_depth2: halved(SEMEAI_BRANCH_DEPTH2),
            semeai_node_limit: exponential_level(SEMEAI_NODE_LIMIT, 1.5, dl),
            connect_depth: doubled(CONNECT_DEPTH),
            connect_depth2: doubled(CONNECT_DEPTH2),
            connection_node_limit: exponential_level(CONNECT_NODE_LIMIT, 1.45, dl),
            breakin_depth: doubled(BREAKIN_DEPTH),
            breakin_node_limit: exponential_level(BREAKIN_NODE_LIMIT, 1.5, dl),
            offset: 0,
        };

        for param in Param::ALL {
            let value = overrides.get(param).unwrap_or(params.get(param));
            params.set(param, value.max(param.floor()));
        }
        params
    }

    pub fn get(&self, param: Param) -> i32 {
        *self.field(param)
    }

    fn set(&mut self, param: Param, value: i32) {
        *self.field_mut(param) = value;
    }

    fn field(&self, param: Param) -> &i32 {
        match param {
            Param::Depth => &self.depth,
            Param::BranchDepth => &self.branch_depth,
            Param::BackfillDepth => &self.backfill_depth,
            Param::Backfill2Depth => &self.backfill2_depth,
            Param::BreakChainDepth => &self.break_chain_depth,
            Param::OwlDistrustDepth => &self.owl_distrust_depth,
            Param::OwlBranchDepth => &self.owl_branch_depth,
            Param::OwlReadingDepth => &self.owl_reading_depth,
            Param::AaDepth => &self.aa_depth,
            Param::KoDepth => &self.ko_depth,
            Param::FourlibDepth => &self.fourlib_depth,
            Param::SuperstringDepth => &self.superstring_depth,
            Param::OwlNodeLimit => &self.owl_node_limit,
            Param::SemeaiBranchDepth => &self.semeai_branch_depth,
            Param::SemeaiBranchDepth2 => &self.semeai_branch_depth2,
            Param::SemeaiNodeLimit => &self.semeai_node_limit,
            Param::ConnectDepth => &self.connect_depth,
            Param::ConnectDepth2 => &self.connect_depth2,
            Param::ConnectionNodeLimit => &self.connection_node_limit,
            Param::BreakinDepth => &self.breakin_depth,
            Param::BreakinNodeLimit => &self.breakin_node_limit,
        }
    }

    fn field_mut(&mut self, param: Param) -> &mut i32 {
        match param {
            Param::Depth => &mut self.depth,
            Param::BranchDepth => &mut self.branch_depth,
            Param::BackfillDepth => &mut self.backfill_depth,
            Param::Backfill2Depth => &mut self.backfill2_depth,
            Param::BreakChainDepth => &mut self.break_chain_depth,
            Param::OwlDistrustDepth => &mut self.owl_distrust_depth,
            Param::OwlBranchDepth => &mut self.owl_branch_depth,
            Param::OwlReadingDepth => &mut self.owl_reading_depth,
            Param::AaDepth => &mut self.aa_depth,
            Param::KoDepth => &mut self.ko_depth,
            Param::FourlibDepth => &mut self.fourlib_depth,
            Param::SuperstringDepth => &mut self.superstring_depth,
            Param::OwlNodeLimit => &mut self.owl_node_limit,
            Param::SemeaiBranchDepth => &mut self.semeai_branch_depth,
            Param::SemeaiBranchDepth2 => &mut self.semeai_branch_depth2,
            Param::SemeaiNodeLimit => &mut self.semeai_node_limit,
            Param::ConnectDepth => &mut self.connect_depth,
            Param::ConnectDepth2 => &mut self.connect_depth2,
            Param::ConnectionNodeLimit => &mut self.connection_node_limit,
            Param::BreakinDepth => &mut self.breakin_depth,
            Param::BreakinNodeLimit => &mut self.breakin_node_limit,
        }
    }

    /// Shift the horizon-sensitive depths by `n`.
    ///
    /// Used to avoid horizon effects: by temporarily increasing the depths
    /// when trying some move, an irrelevant move cannot look effective just
    /// because reading hits a depth limit earlier than it did when reading
    /// only relevant moves. Calls must be balanced by the caller.
    pub fn apply_delta(&mut self, n: i32) {
        for param in Param::HORIZON {
            let field = self.field_mut(param);
            *field = field.wrapping_add(n);
        }
        self.offset = self.offset.wrapping_add(n);
    }

    pub fn increase(&mut self) {
        self.apply_delta(1);
    }

    pub fn decrease(&mut self) {
        self.apply_delta(-1);
    }

    /// Sum of all deltas applied since the last recompute.
    pub fn cumulative_delta(&self) -> i32 {
        self.offset
    }

    /// Textual dump of every parameter.
    pub fn report(&self, level: i32) -> String {
        let lines: Vec<String> = Param::ALL
            .into_iter()
            .map(|param| format!("{param}: {}", self.get(param)))
            .collect();
        format!("at level {level}:\n\n{}\n", lines.join("\n"))
    }
}

/// The budget context passed to the reading code: current level, manual
/// overrides and the parameters derived from them.
///
/// Recompute only between searches; the reading code holds a reference
/// to the parameters for the duration of a search.
#[derive(Clone, Debug)]
pub struct DepthBudget {
    level: i32,
    overrides: Overrides,
    params: DepthParams,
}

impl Default for DepthBudget {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl DepthBudget {
    pub fn new(level: i32) -> Self {
        Self::with_overrides(level, Overrides::new())
    }

    pub fn with_overrides(level: i32, overrides: Overrides) -> Self {
        let params = DepthParams::compute(level, &overrides);
        Self {
            level,
            overrides,
            params,
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Derive all parameters from `level`. Resets the cumulative delta.
    /// With `report` set, the full parameter dump is logged.
    pub fn recompute(&mut self, level: i32, report: bool) {
        self.level = level;
        self.params = DepthParams::compute(level, &self.overrides);
        if report {
            log::info!("{}", self.params.report(level));
        }
    }

    /// Recompute at the current level, as done when a new position is set up.
    pub fn reset(&mut self) {
        self.recompute(self.level, false);
    }

    /// Override a parameter. Takes effect at the next recompute.
    pub fn set_override(&mut self, param: Param, value: i32) {
        self.overrides.set(param, value);
    }

    pub fn clear_override(&mut self, param: Param) {
        self.overrides.clear(param);
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn params(&self) -> &DepthParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut DepthParams {
        &mut self.params
    }
}
