//! Rules core for character-sheet lists.
//!
//! `sheet-core` owns the entity model (traits, trait modifiers, notes,
//! ancestries), the generic container/leaf tree they live in, and the
//! point-cost algorithm that folds modifiers across nested scopes. Everything
//! here is pure and synchronous; file formats and migration live in
//! `sheet-content`.
pub mod cost;
pub mod display;
pub mod error;
pub mod fxp;
pub mod model;
pub mod nameables;
pub mod settings;
pub mod sheet;
pub mod tags;
pub mod tid;
pub mod tree;
pub use cost::{PointInputs, adjusted_points, alternative_abilities_total, modify_points};
pub use display::{
    Alignment, CellData, CellKind, HeaderData, NoteColumn, TraitColumn, TraitModifierColumn,
};
pub use error::{ErrorSeverity, SheetError, TreeError};
pub use fxp::{Fxp, FxpParseError};
pub use model::{
    Affects, Ancestry, AncestryOptions, ContainerType, CostType, Feature, Note, PrereqList,
    SelfControlAdjustment, SelfControlRoll, Study, StudyHoursNeeded, StudyType, TemplatePicker,
    TemplatePickerType, Trait, TraitModifier, Weapon, WeightedOption,
};
pub use nameables::NameableKeys;
pub use settings::{DisplayOption, DisplayTarget, SheetSettings};
pub use sheet::{Sheet, SheetRef};
pub use tags::{combine_tags, convert_old_categories_to_tags, extract_tags, has_tag};
pub use tid::{EntityKind, KindFamily, Tid, TidError};
pub use tree::{Node, NodeId, NodeTree, SharedTree, Traversal};
