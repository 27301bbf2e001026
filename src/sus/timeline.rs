//! Timeline builder, which maps measures into beats and beats into seconds.
//!
//! Both mappings are piecewise-linear step functions over sparse anchors, so they share [`PiecewiseLinear`]:
//!
//! - [`MeasureToBeat`] has [`BeatPerMeasureChange`]s as anchors, and the rate is beats per measure.
//! - [`BeatToSec`] has [`BpmChange`]s as anchors, and the rate is `60 / bpm` seconds per beat.
//!
//! Before the first anchor, positions are extrapolated from the origin with the rate of the first anchor.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::sus::{
    AnchorKind, SusError, SusErrorWithRange, SusWarning, SusWarningWithRange,
    command::{
        Column,
        mixin::{SourceRangeMixin, SourceRangeMixinExt},
        time::{Measure, MeasurePosition},
    },
    lex::{Directive, DirectiveWithRange, decode::ObjIter},
    model::{BeatPerMeasureChange, BpmChange},
    push_warning,
};

/// A resolved point of a piecewise-linear mapping.
pub trait Anchor {
    /// The input unit of the mapping.
    type Position: Copy + PartialOrd;

    /// Which table the anchors come from, reported when the table is empty.
    const KIND: AnchorKind;

    /// The input position mapped to the origin value given to [`PiecewiseLinear::resolve`].
    const ORIGIN: Self::Position;

    /// The input position of this anchor.
    fn position(&self) -> Self::Position;

    /// The output value at this anchor.
    fn resolved(&self) -> f64;

    /// Stores the output value at this anchor.
    fn set_resolved(&mut self, value: f64);

    /// Output units per input unit from this anchor.
    fn rate(&self) -> f64;

    /// The signed distance from `from` to `to` in input units.
    fn distance(from: Self::Position, to: Self::Position) -> f64;
}

impl Anchor for BeatPerMeasureChange {
    type Position = MeasurePosition;
    const KIND: AnchorKind = AnchorKind::TimeSignature;
    const ORIGIN: MeasurePosition = MeasurePosition::ZERO;

    fn position(&self) -> MeasurePosition {
        self.pos_measure
    }

    fn resolved(&self) -> f64 {
        self.pos_beat
    }

    fn set_resolved(&mut self, value: f64) {
        self.pos_beat = value;
    }

    fn rate(&self) -> f64 {
        self.beats_per_measure
    }

    fn distance(from: MeasurePosition, to: MeasurePosition) -> f64 {
        from.measures_until(to)
    }
}

impl Anchor for BpmChange {
    type Position = f64;
    const KIND: AnchorKind = AnchorKind::Tempo;
    const ORIGIN: f64 = 0.0;

    fn position(&self) -> f64 {
        self.pos_beat
    }

    fn resolved(&self) -> f64 {
        self.pos_sec
    }

    fn set_resolved(&mut self, value: f64) {
        self.pos_sec = value;
    }

    fn rate(&self) -> f64 {
        60.0 / self.bpm
    }

    fn distance(from: f64, to: f64) -> f64 {
        to - from
    }
}

/// A piecewise-linear step function over anchors sorted by their positions.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseLinear<A> {
    origin_value: f64,
    first_rate: f64,
    anchors: Vec<A>,
}

impl<A: Anchor> PiecewiseLinear<A> {
    /// Resolves the output values of `anchors` from the origin, and builds the mapping.
    ///
    /// `anchors` must be sorted by their positions in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::UndefinedAnchor`] if `anchors` is empty.
    pub fn resolve(mut anchors: Vec<A>, origin_value: f64) -> Result<Self, SusError> {
        let first_rate = anchors
            .first()
            .map(A::rate)
            .ok_or(SusError::UndefinedAnchor(A::KIND))?;

        let mut position = A::ORIGIN;
        let mut value = origin_value;
        let mut rate = first_rate;
        for anchor in &mut anchors {
            value += A::distance(position, anchor.position()) * rate;
            anchor.set_resolved(value);
            position = anchor.position();
            rate = anchor.rate();
        }

        Ok(Self {
            origin_value,
            first_rate,
            anchors,
        })
    }

    /// Maps `position` into the output unit.
    #[must_use]
    pub fn eval(&self, position: A::Position) -> f64 {
        let Some(anchor) = self
            .anchors
            .iter()
            .take_while(|anchor| anchor.position() <= position)
            .last()
        else {
            return self.origin_value + A::distance(A::ORIGIN, position) * self.first_rate;
        };
        if anchor.position() == position {
            return anchor.resolved();
        }
        anchor.resolved() + A::distance(anchor.position(), position) * anchor.rate()
    }

    /// The resolved anchors.
    #[must_use]
    pub fn anchors(&self) -> &[A] {
        &self.anchors
    }

    /// Leans the resolved anchors out.
    #[must_use]
    pub fn into_anchors(self) -> Vec<A> {
        self.anchors
    }
}

/// The mapping from measure-space positions into beats.
pub type MeasureToBeat = PiecewiseLinear<BeatPerMeasureChange>;

/// The mapping from beats into seconds.
pub type BeatToSec = PiecewiseLinear<BpmChange>;

impl MeasureToBeat {
    /// Builds the mapping from `#mmm02` directives. A later directive on the same measure replaces the older one.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::UndefinedAnchor`] if there is no time signature.
    pub fn from_directives(
        directives: &[DirectiveWithRange<'_>],
        warnings: &mut Vec<SusWarningWithRange>,
    ) -> Result<Self, SusError> {
        let mut changes: BTreeMap<Measure, BeatPerMeasureChange> = BTreeMap::new();
        for directive in directives {
            let &Directive::TimeSignatureEntry {
                measure,
                beats_per_measure,
            } = directive.content()
            else {
                continue;
            };
            let change = BeatPerMeasureChange::new(beats_per_measure, measure.into());
            if changes.insert(measure, change).is_some() {
                push_warning(
                    warnings,
                    SusWarning::DuplicateTimeSignature(measure).into_wrapper(directive),
                );
            }
        }
        let mapping = Self::resolve(changes.into_values().collect(), 0.0)?;
        log::debug!(
            "resolved {} time signature anchors",
            mapping.anchors().len()
        );
        Ok(mapping)
    }

    /// Maps `position` into beats.
    #[must_use]
    pub fn beat_at(&self, position: MeasurePosition) -> f64 {
        self.eval(position)
    }
}

impl BeatToSec {
    /// Builds the mapping from tempo changes, with the origin at `-wave_offset_sec`.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::UndefinedAnchor`] if `bpm_changes` is empty.
    pub fn from_bpm_changes(
        mut bpm_changes: Vec<BpmChange>,
        wave_offset_sec: f64,
    ) -> Result<Self, SusError> {
        bpm_changes.sort_by(|a, b| a.pos_beat.total_cmp(&b.pos_beat));
        let mapping = Self::resolve(bpm_changes, -wave_offset_sec)?;
        log::debug!("resolved {} tempo anchors", mapping.anchors().len());
        Ok(mapping)
    }

    /// Maps `beat` into seconds.
    #[must_use]
    pub fn sec_at(&self, beat: f64) -> f64 {
        self.eval(beat)
    }
}

/// Tempo-table entries from `#BPMzz` directives, and which of them are referenced.
#[derive(Debug, Clone, Default)]
pub struct TempoTable {
    entries: HashMap<u32, SourceRangeMixin<f64>>,
    used: HashSet<u32>,
}

impl TempoTable {
    /// Collects entries from all the directives. A later definition of the same index replaces the older one.
    pub fn from_directives(
        directives: &[DirectiveWithRange<'_>],
        warnings: &mut Vec<SusWarningWithRange>,
    ) -> Self {
        let mut entries = HashMap::new();
        for directive in directives {
            let &Directive::TempoTableEntry { index, bpm } = directive.content() else {
                continue;
            };
            if entries.insert(index, bpm.into_wrapper(directive)).is_some() {
                push_warning(
                    warnings,
                    SusWarning::DuplicateTempoDefinition(index).into_wrapper(directive),
                );
            }
        }
        Self {
            entries,
            used: HashSet::new(),
        }
    }

    /// Places tempo changes referenced on `#mmm08` lines. A later reference on the same position replaces the older one.
    ///
    /// # Errors
    ///
    /// Returns [`SusError::UndefinedTempoIndex`] if a reference has no definition.
    pub fn place_changes(
        &mut self,
        directives: &[DirectiveWithRange<'_>],
        measure_to_beat: &MeasureToBeat,
        warnings: &mut Vec<SusWarningWithRange>,
    ) -> Result<Vec<BpmChange>, SusErrorWithRange> {
        let mut changes: BTreeMap<MeasurePosition, BpmChange> = BTreeMap::new();
        for directive in directives {
            let &Directive::TimedData {
                measure,
                column: Column::TempoReference,
                payload,
            } = directive.content()
            else {
                continue;
            };
            for obj in ObjIter::new(payload) {
                let index = u32::from_str_radix(obj.code, 36).map_err(|_| {
                    SusError::MalformedLine {
                        message: format!("expected base-36 tempo index, found `{}`", obj.code),
                    }
                    .into_wrapper(directive)
                })?;
                let bpm = self
                    .entries
                    .get(&index)
                    .map(|bpm| *bpm.content())
                    .ok_or_else(|| SusError::UndefinedTempoIndex(index).into_wrapper(directive))?;
                self.used.insert(index);

                let position = obj.position(measure);
                let change = BpmChange::new(bpm, measure_to_beat.beat_at(position));
                if changes.insert(position, change).is_some() {
                    push_warning(
                        warnings,
                        SusWarning::DuplicateTempoChange(position).into_wrapper(directive),
                    );
                }
            }
        }
        Ok(changes.into_values().collect())
    }

    /// Reports entries which no `#mmm08` line referenced.
    pub fn report_unused(&self, warnings: &mut Vec<SusWarningWithRange>) {
        let mut unused: Vec<_> = self
            .entries
            .iter()
            .filter(|&(index, _)| !self.used.contains(index))
            .collect();
        unused.sort_by_key(|(_, entry)| entry.start());
        for (&index, entry) in unused {
            push_warning(
                warnings,
                SusWarning::UnusedTempoDefinition(index).into_wrapper(entry),
            );
        }
    }
}
