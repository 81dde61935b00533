//! Table cells and headers handed to the rendering collaborator.
//!
//! Nothing here is cached: every call recomputes from the current field
//! values, so edits only need to be followed by a fresh `cell_data` call.

use crate::model::{Note, Trait, TraitModifier};
use crate::model::study::{resolve_study_hours, study_hours_progress_text};
use crate::settings::DisplayTarget;
use crate::sheet;
use crate::tags::combine_tags;
use crate::tree::{Node, NodeId, NodeTree, Traversal};

/// Image key used as the title of page-reference columns.
pub const HEADER_BOOKMARK: &str = "bookmark";

const PAGE_REF_DETAIL: &str = "A reference to the book and page the item appears on \
(e.g. B22 would refer to \"Basic Set\", page 22)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellKind {
    #[default]
    Text,
    Toggle,
    PageRef,
    Markdown,
    Tags,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}

/// Column header description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderData {
    pub title: String,
    pub detail: String,
    pub primary: bool,
    /// `title` names an image rather than text.
    pub title_is_image_key: bool,
}

impl HeaderData {
    fn titled(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            ..Self::default()
        }
    }

    fn primary(title: &str) -> Self {
        Self {
            primary: true,
            ..Self::titled(title)
        }
    }

    fn detailed(title: &str, detail: &str) -> Self {
        Self {
            detail: detail.to_owned(),
            ..Self::titled(title)
        }
    }

    fn page_ref() -> Self {
        Self {
            title_is_image_key: true,
            ..Self::detailed(HEADER_BOOKMARK, PAGE_REF_DETAIL)
        }
    }
}

/// Content of one table cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellData {
    pub kind: CellKind,
    pub primary: String,
    pub secondary: String,
    pub tooltip: String,
    pub disabled: bool,
    pub dim: bool,
    pub checked: bool,
    pub alignment: Alignment,
    pub inline_tag: String,
    pub template_info: String,
    pub unsatisfied_reason: String,
}

impl CellData {
    fn page_ref(page_ref: &str, highlight: &str, fallback: &str) -> Self {
        let secondary = if highlight.is_empty() { fallback } else { highlight };
        Self {
            kind: CellKind::PageRef,
            primary: page_ref.to_owned(),
            secondary: secondary.to_owned(),
            ..Self::default()
        }
    }

    fn tags(tags: &[String]) -> Self {
        Self {
            kind: CellKind::Tags,
            primary: combine_tags(tags),
            ..Self::default()
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TraitColumn {
    Description,
    Points,
    Tags,
    Reference,
}

impl TraitColumn {
    pub fn header(self) -> HeaderData {
        match self {
            Self::Description => HeaderData::primary("Trait"),
            Self::Points => HeaderData::detailed("Pts", "Points"),
            Self::Tags => HeaderData::titled("Tags"),
            Self::Reference => HeaderData::page_ref(),
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TraitModifierColumn {
    Enabled,
    Description,
    Cost,
    Tags,
    Reference,
}

impl TraitModifierColumn {
    pub fn header(self) -> HeaderData {
        match self {
            Self::Enabled => HeaderData::detailed("", "Whether this modifier has been enabled or not"),
            Self::Description => HeaderData::primary("Trait Modifier"),
            Self::Cost => HeaderData::detailed("Cost Modifier", "The cost modifier"),
            Self::Tags => HeaderData::titled("Tags"),
            Self::Reference => HeaderData::page_ref(),
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum NoteColumn {
    Text,
    Reference,
}

impl NoteColumn {
    pub fn header(self) -> HeaderData {
        match self {
            Self::Text => HeaderData::primary("Note"),
            Self::Reference => HeaderData::page_ref(),
        }
    }
}

fn append_on_new_line(buffer: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(text);
}

impl Trait {
    /// Self-control text followed by each enabled modifier's description.
    pub fn modifier_notes(&self) -> String {
        let mut buffer = String::new();
        if !self.cr.is_none() {
            buffer.push_str(&self.cr.to_string());
            if !self.cr_adj.is_none() {
                buffer.push_str(", ");
                buffer.push_str(&self.cr_adj.description(self.cr));
            }
        }
        for (_, modifier) in self
            .modifiers
            .walk(Traversal::EXCLUDE_DISABLED | Traversal::EXCLUDE_CONTAINERS)
        {
            if !buffer.is_empty() {
                buffer.push_str("; ");
            }
            buffer.push_str(&modifier.full_description());
        }
        buffer
    }

    /// Text shown below (or in the tooltip of) the trait's name, per the
    /// owning sheet's display options.
    pub fn secondary_text(&self, target: DisplayTarget) -> String {
        let settings = sheet::settings_for(self.owner());
        let mut buffer = String::new();
        if settings.user_description_display.shows(target) {
            buffer.push_str(&self.user_desc);
        }
        if settings.modifiers_display.shows(target) {
            append_on_new_line(&mut buffer, &self.modifier_notes());
        }
        if settings.notes_display.shows(target) {
            append_on_new_line(&mut buffer, self.resolved_notes().trim());
            let progress = study_hours_progress_text(
                resolve_study_hours(&self.leaf.study),
                self.leaf.study_hours_needed,
                false,
            );
            append_on_new_line(&mut buffer, &progress);
        }
        buffer
    }
}

impl NodeTree<Trait> {
    pub fn cell_data(&self, id: NodeId, column: TraitColumn) -> CellData {
        let Some(t) = self.get(id) else {
            return CellData::default();
        };
        let mut data = match column {
            TraitColumn::Description => CellData {
                primary: t.to_string(),
                secondary: t.secondary_text(DisplayTarget::Inline),
                tooltip: t.secondary_text(DisplayTarget::Tooltip),
                disabled: self.effectively_disabled(id),
                unsatisfied_reason: t.unsatisfied_reason.clone(),
                template_info: t.container.template_picker.description(),
                inline_tag: if t.is_container() {
                    t.container.container_type.inline_tag().unwrap_or_default().to_owned()
                } else {
                    String::new()
                },
                ..CellData::default()
            },
            TraitColumn::Points => CellData {
                primary: self.adjusted_points(id).to_string(),
                alignment: Alignment::End,
                ..CellData::default()
            },
            TraitColumn::Tags => CellData::tags(&t.tags),
            TraitColumn::Reference => CellData::page_ref(&t.page_ref, &t.page_ref_highlight, &t.name),
        };
        data.dim = !t.is_self_enabled();
        data
    }
}

impl NodeTree<TraitModifier> {
    pub fn cell_data(&self, id: NodeId, column: TraitModifierColumn) -> CellData {
        let Some(m) = self.get(id) else {
            return CellData::default();
        };
        match column {
            TraitModifierColumn::Enabled if !m.is_container() => CellData {
                kind: CellKind::Toggle,
                checked: m.is_self_enabled(),
                alignment: Alignment::Middle,
                ..CellData::default()
            },
            TraitModifierColumn::Description => CellData {
                primary: m.name.clone(),
                secondary: m.secondary_text(DisplayTarget::Inline),
                tooltip: m.secondary_text(DisplayTarget::Tooltip),
                ..CellData::default()
            },
            TraitModifierColumn::Cost if !m.is_container() => CellData {
                primary: m.cost_description(),
                ..CellData::default()
            },
            TraitModifierColumn::Tags => CellData::tags(&m.tags),
            TraitModifierColumn::Reference => {
                CellData::page_ref(&m.page_ref, &m.page_ref_highlight, &m.name)
            }
            TraitModifierColumn::Enabled | TraitModifierColumn::Cost => CellData::default(),
        }
    }
}

impl NodeTree<Note> {
    pub fn cell_data(&self, id: NodeId, column: NoteColumn) -> CellData {
        let Some(note) = self.get(id) else {
            return CellData::default();
        };
        let text = note.resolved_text();
        match column {
            NoteColumn::Text => CellData {
                kind: CellKind::Markdown,
                primary: text,
                ..CellData::default()
            },
            NoteColumn::Reference => CellData::page_ref(&note.page_ref, &note.page_ref_highlight, &text),
        }
    }
}
