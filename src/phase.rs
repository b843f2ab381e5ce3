/// One timed step of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDefinition {
    pub kind: PhaseKind,
    pub name: &'static str,
    pub duration_secs: u32,
    pub description: &'static str,
    pub objective: &'static str,
}

/// What the presentation layer shows while a phase is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum PhaseKind {
    WarmUp,
    Reading,
    Expression,
    Writing,
}

pub const PHASES: [PhaseDefinition; 4] = [
    PhaseDefinition {
        kind: PhaseKind::WarmUp,
        name: "Mental Warm-up",
        duration_secs: 5 * 60,
        description: "Free associations with the word",
        objective: "Activate creativity and cognitive flexibility, breaking initial blocks",
    },
    PhaseDefinition {
        kind: PhaseKind::Reading,
        name: "Active Reading",
        duration_secs: 10 * 60,
        description: "6 min reading + 4 min summary",
        objective: "Train focus and quick comprehension, building the ability to synthesize",
    },
    PhaseDefinition {
        kind: PhaseKind::Expression,
        name: "Rapid Expression",
        duration_secs: 10 * 60,
        description: "Talk about the proposed theme",
        objective: "Improve verbal fluency and reduce self-censorship when speaking in public",
    },
    PhaseDefinition {
        kind: PhaseKind::Writing,
        name: "Quick Writing",
        duration_secs: 5 * 60,
        description: "Write freely about the word",
        objective: "Encourage writing flow and consolidate ideas from the previous steps",
    },
];

pub const PHASE_COUNT: usize = PHASES.len();

pub const LAST_PHASE: usize = PHASE_COUNT - 1;

/// Length of a whole session in seconds
pub const fn total_duration() -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < PHASE_COUNT {
        total += PHASES[i].duration_secs;
        i += 1;
    }
    total
}

pub const TOTAL_DURATION_SECS: u32 = total_duration();

/// Seconds elapsed before `index` begins (sum of all earlier durations).
pub fn phase_start(index: usize) -> u32 {
    PHASES
        .iter()
        .take(index.min(PHASE_COUNT))
        .map(|p| p.duration_secs)
        .sum()
}

/// Cumulative boundary at which `index` ends.
pub fn phase_end(index: usize) -> u32 {
    phase_start(index.min(LAST_PHASE) + 1)
}

/// Phase active at `elapsed_secs`.
///
/// End boundaries are inclusive: at exactly 300s the session is still in
/// the first phase (at 100% of it) and moves on with the following second.
/// Anything past the total clamps to the final phase.
pub fn phase_index_at(elapsed_secs: u32) -> usize {
    let mut boundary = 0;
    for (i, phase) in PHASES.iter().enumerate() {
        boundary += phase.duration_secs;
        if elapsed_secs <= boundary {
            return i;
        }
    }
    LAST_PHASE
}
