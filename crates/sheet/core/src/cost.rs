//! Point-cost computation for traits.
//!
//! A leaf's cost folds its own base and leveled cost with every modifier
//! visible to it (its own plus those of each ancestor container):
//!
//! ```text
//! Points modifiers     → added to base (or per-level cost for levels_only)
//! Percentage modifiers → base/level × enhancement/limitation buckets
//! Multiplier modifiers → running multiplier, seeded by the self-control roll
//!
//! result = round(modify(base, leveled, buckets) × multiplier)
//! ```
//!
//! Rounding happens exactly once, on the final product. Settings are always
//! passed in; nothing here reads global state.

use crate::fxp::Fxp;
use crate::model::{Affects, ContainerType, CostType, SelfControlRoll, Trait, TraitModifier};
use crate::settings::SheetSettings;
use crate::sheet;
use crate::tree::{Node, NodeId, NodeTree, Traversal};

/// Lowest combined percentage a set of limitations can reach.
pub const LIMITATION_FLOOR: Fxp = Fxp::from_int(-80);

/// Per-leaf inputs of [`adjusted_points`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointInputs {
    pub can_level: bool,
    pub base_points: Fxp,
    pub levels: Fxp,
    pub points_per_level: Fxp,
    pub cr: SelfControlRoll,
    pub round_down: bool,
}

impl PointInputs {
    pub fn for_trait(t: &Trait) -> Self {
        Self {
            can_level: t.leaf.can_level,
            base_points: t.leaf.base_points,
            levels: t.leaf.levels,
            points_per_level: t.leaf.points_per_level,
            cr: t.cr,
            round_down: t.leaf.round_cost_down,
        }
    }
}

/// Percentage sums, split by sign and by the part of the cost they affect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Buckets {
    base_enhancement: Fxp,
    level_enhancement: Fxp,
    base_limitation: Fxp,
    level_limitation: Fxp,
}

impl Buckets {
    fn add(&mut self, affects: Affects, percent: Fxp, limitation: bool) {
        let (base, level) = if limitation {
            (&mut self.base_limitation, &mut self.level_limitation)
        } else {
            (&mut self.base_enhancement, &mut self.level_enhancement)
        };
        if affects.touches_base() {
            *base += percent;
        }
        if affects.touches_levels() {
            *level += percent;
        }
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `value × percent / 100`.
pub fn calculate_modifier_points(value: Fxp, percent: Fxp) -> Fxp {
    value * percent / Fxp::HUNDRED
}

/// `value + value × percent / 100`, unrounded.
pub fn modify_points(value: Fxp, percent: Fxp) -> Fxp {
    value + calculate_modifier_points(value, percent)
}

/// Final point cost of a trait leaf.
///
/// `modifiers` is every modifier visible to the leaf; containers and disabled
/// modifiers in it are ignored. Disablement of the trait itself is the
/// caller's concern (see [`NodeTree::adjusted_points`]).
pub fn adjusted_points<'a, I>(settings: &SheetSettings, inputs: PointInputs, modifiers: I) -> Fxp
where
    I: IntoIterator<Item = &'a TraitModifier>,
{
    let PointInputs {
        can_level,
        mut base_points,
        mut levels,
        mut points_per_level,
        cr,
        round_down,
    } = inputs;
    if !can_level {
        levels = Fxp::ZERO;
        points_per_level = Fxp::ZERO;
    }

    let mut buckets = Buckets::default();
    let mut multiplier = cr.multiplier();
    for modifier in modifiers {
        if modifier.is_container() || !modifier.is_self_enabled() {
            continue;
        }
        let amount = modifier.cost_modifier();
        let affects = modifier.leaf.affects;
        match &modifier.leaf.cost_type {
            CostType::Percentage => buckets.add(affects, amount, amount.is_negative()),
            // Counted as an enhancement whatever its sign.
            CostType::Unrecognized(_) => buckets.add(affects, amount, false),
            CostType::Points => {
                if affects == Affects::LevelsOnly {
                    if can_level {
                        points_per_level += amount;
                    }
                } else {
                    base_points += amount;
                }
            }
            CostType::Multiplier => multiplier *= amount,
        }
    }

    let leveled_points = points_per_level * levels;
    let modified = if buckets.is_empty() {
        base_points + leveled_points
    } else if settings.use_multiplicative_modifiers {
        // Equality is decided on the unfloored buckets.
        let same_split = buckets.base_enhancement == buckets.level_enhancement
            && buckets.base_limitation == buckets.level_limitation;
        let base_limitation = buckets.base_limitation.max(LIMITATION_FLOOR);
        let level_limitation = buckets.level_limitation.max(LIMITATION_FLOOR);
        if same_split {
            modify_points(
                modify_points(base_points + leveled_points, buckets.base_enhancement),
                base_limitation,
            )
        } else {
            modify_points(modify_points(base_points, buckets.base_enhancement), base_limitation)
                + modify_points(
                    modify_points(leveled_points, buckets.level_enhancement),
                    level_limitation,
                )
        }
    } else {
        let base_percent = (buckets.base_enhancement + buckets.base_limitation).max(LIMITATION_FLOOR);
        let level_percent = (buckets.level_enhancement + buckets.level_limitation).max(LIMITATION_FLOOR);
        if base_percent == level_percent {
            modify_points(base_points + leveled_points, base_percent)
        } else {
            modify_points(base_points, base_percent) + modify_points(leveled_points, level_percent)
        }
    };

    (modified * multiplier).apply_rounding(round_down)
}

/// Total of an alternative-abilities container: the highest value in full,
/// plus 20% of every other value (including further copies of the highest).
/// Each surcharge is rounded on its own.
pub fn alternative_abilities_total(values: &[Fxp], round_down: bool) -> Fxp {
    let maximum = values.iter().copied().fold(Fxp::ZERO, Fxp::max);
    let mut total = maximum;
    let mut found = false;
    for &value in values {
        if !found && value == maximum {
            found = true;
        } else {
            total += calculate_modifier_points(value, Fxp::TWENTY).apply_rounding(round_down);
        }
    }
    total
}

impl NodeTree<Trait> {
    /// Enabled modifier leaves of `id` followed by those of each ancestor.
    pub fn all_modifiers(&self, id: NodeId) -> Vec<&TraitModifier> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter_map(|current| self.get(current))
            .flat_map(|t| {
                t.modifiers
                    .walk(Traversal::EXCLUDE_DISABLED | Traversal::EXCLUDE_CONTAINERS)
                    .map(|(_, modifier)| modifier)
            })
            .collect()
    }

    /// Point cost of a trait or container; zero when effectively disabled.
    pub fn adjusted_points(&self, id: NodeId) -> Fxp {
        if self.effectively_disabled(id) {
            return Fxp::ZERO;
        }
        let Some(t) = self.get(id) else {
            return Fxp::ZERO;
        };
        if !t.is_container() {
            let settings = sheet::settings_for(t.owner());
            return adjusted_points(&settings, PointInputs::for_trait(t), self.all_modifiers(id));
        }

        let values: Vec<Fxp> = self
            .children(id)
            .iter()
            .map(|&child| self.adjusted_points(child))
            .collect();
        match t.container.container_type {
            ContainerType::AlternativeAbilities => {
                alternative_abilities_total(&values, t.leaf.round_cost_down)
            }
            _ => values.into_iter().sum(),
        }
    }

    /// Sum of the adjusted points of every top-level node.
    pub fn total_points(&self) -> Fxp {
        self.roots().iter().map(|&root| self.adjusted_points(root)).sum()
    }

    /// Levels of an effectively enabled leveled trait, else zero.
    pub fn current_level(&self, id: NodeId) -> Fxp {
        match self.get(id) {
            Some(t) if t.is_leveled() && self.is_enabled(id) => t.leaf.levels,
            _ => Fxp::ZERO,
        }
    }
}
