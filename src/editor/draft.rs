// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Record-level form state for the edit screen.

use crate::editor::{FieldEditor, LineInput};
use crate::model::{JsonField, Tour, TourFields, TourId, TourType, ValidationError};

/// Inputs on the Basic tab, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicField {
    Title,
    Slug,
    TourType,
    Destination,
    PromoUrl,
}

impl BasicField {
    pub const ALL: [BasicField; 5] = [
        BasicField::Title,
        BasicField::Slug,
        BasicField::TourType,
        BasicField::Destination,
        BasicField::PromoUrl,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Slug => "Slug",
            Self::TourType => "Type",
            Self::Destination => "Destination",
            Self::PromoUrl => "Promo URL",
        }
    }
}

/// A tour record being created or edited.
///
/// Scalar columns live in line inputs, the JSON columns in one field editor
/// each. `collect` turns the draft back into validated fields; whether that
/// becomes an insert or an update is decided by `id`.
#[derive(Debug, Clone)]
pub struct EditDraft {
    id: Option<TourId>,
    created_at: Option<String>,
    title: LineInput,
    slug: LineInput,
    tour_type: TourType,
    destination: LineInput,
    promo_url: LineInput,
    editors: [FieldEditor; 6],
}

impl EditDraft {
    fn from_fields(id: Option<TourId>, created_at: Option<String>, fields: &TourFields) -> Self {
        Self {
            id,
            created_at,
            title: LineInput::from_text(fields.title()),
            slug: LineInput::from_text(fields.slug()),
            tour_type: fields.tour_type(),
            destination: LineInput::from_text(fields.destination()),
            promo_url: LineInput::from_text(fields.promo_url().unwrap_or_default()),
            editors: JsonField::ALL
                .map(|field| FieldEditor::new(field, fields.document(field).clone())),
        }
    }

    /// Empty draft for a new record.
    pub fn create() -> Self {
        Self::from_fields(None, None, &TourFields::default())
    }

    /// Draft seeded from an existing row; saving updates that row.
    pub fn edit(tour: &Tour) -> Self {
        Self::from_fields(
            Some(tour.id().clone()),
            tour.created_at().map(str::to_owned),
            tour.fields(),
        )
    }

    /// Draft copied from an existing row; saving inserts a new one.
    pub fn duplicate(tour: &Tour, unix_millis: u64) -> Self {
        Self::from_fields(None, None, &tour.fields().duplicated(unix_millis))
    }

    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }

    pub fn id(&self) -> Option<&TourId> {
        self.id.as_ref()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn tour_type(&self) -> TourType {
        self.tour_type
    }

    pub fn cycle_tour_type(&mut self) {
        self.tour_type = self.tour_type.cycle();
    }

    /// The editable input behind a Basic field; `TourType` has none, it is
    /// cycled in place.
    pub fn line_input(&self, field: BasicField) -> Option<&LineInput> {
        match field {
            BasicField::Title => Some(&self.title),
            BasicField::Slug => Some(&self.slug),
            BasicField::TourType => None,
            BasicField::Destination => Some(&self.destination),
            BasicField::PromoUrl => Some(&self.promo_url),
        }
    }

    pub fn line_input_mut(&mut self, field: BasicField) -> Option<&mut LineInput> {
        match field {
            BasicField::Title => Some(&mut self.title),
            BasicField::Slug => Some(&mut self.slug),
            BasicField::TourType => None,
            BasicField::Destination => Some(&mut self.destination),
            BasicField::PromoUrl => Some(&mut self.promo_url),
        }
    }

    pub fn slug_text(&self) -> &str {
        self.slug.text()
    }

    pub fn editor(&self, field: JsonField) -> &FieldEditor {
        &self.editors[editor_index(field)]
    }

    pub fn editor_mut(&mut self, field: JsonField) -> &mut FieldEditor {
        &mut self.editors[editor_index(field)]
    }

    /// Builds the fields this draft describes, validated. Uses the committed
    /// document of every editor; callers blur the active editor first so a
    /// pending raw edit is not silently lost.
    pub fn collect(&self) -> Result<TourFields, ValidationError> {
        let mut fields = TourFields::default();
        fields.set_title(self.title.text());
        fields.set_slug(self.slug.text());
        fields.set_tour_type(self.tour_type);
        fields.set_destination(self.destination.text());
        fields.set_promo_url(match self.promo_url.text() {
            "" => None,
            url => Some(url),
        });
        for editor in &self.editors {
            fields.set_document(editor.field(), editor.document().clone());
        }

        fields.validate()?;
        Ok(fields)
    }
}

fn editor_index(field: JsonField) -> usize {
    JsonField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .expect("field present in ALL")
}

#[cfg(test)]
mod tests {
    use super::{BasicField, EditDraft};
    use crate::model::fixtures::single_tour;
    use crate::model::{Document, JsonField, TourType, ValidationError};

    #[test]
    fn create_draft_starts_with_field_defaults() {
        let draft = EditDraft::create();

        assert!(draft.is_create());
        assert_eq!(draft.tour_type(), TourType::Group);
        assert_eq!(
            draft.editor(JsonField::Itinerary).document(),
            &Document::empty_list()
        );
        assert_eq!(
            draft.editor(JsonField::Pricing).document(),
            &Document::empty_map()
        );
    }

    #[test]
    fn edit_draft_seeds_inputs_from_the_row() {
        let tour = single_tour();
        let draft = EditDraft::edit(&tour);

        assert!(!draft.is_create());
        assert_eq!(draft.id(), Some(tour.id()));
        assert_eq!(draft.created_at(), tour.created_at());
        assert_eq!(
            draft.line_input(BasicField::Title).map(|input| input.text()),
            Some(tour.fields().title())
        );
        assert!(draft.line_input(BasicField::TourType).is_none());
    }

    #[test]
    fn edit_draft_collects_back_to_the_same_fields() {
        let tour = single_tour();
        let draft = EditDraft::edit(&tour);

        let collected = draft.collect().expect("valid draft");
        assert_eq!(&collected, tour.fields());
    }

    #[test]
    fn duplicate_draft_becomes_a_new_record() {
        let tour = single_tour();
        let draft = EditDraft::duplicate(&tour, 1_766_000_000_000);

        assert!(draft.is_create());
        assert_eq!(draft.created_at(), None);
        let collected = draft.collect().expect("valid draft");
        assert_eq!(collected.title(), format!("{} (copy)", tour.fields().title()));
        assert_eq!(
            collected.slug(),
            format!("{}-copy-1766000000000", tour.fields().slug())
        );
        assert_eq!(collected.document(JsonField::Content), tour.fields().document(JsonField::Content));
    }

    #[test]
    fn collect_reports_missing_title_before_missing_slug() {
        let mut draft = EditDraft::create();
        assert_eq!(draft.collect(), Err(ValidationError::TitleRequired));

        draft
            .line_input_mut(BasicField::Title)
            .expect("title input")
            .set_text("Fjord Week");
        assert_eq!(draft.collect(), Err(ValidationError::SlugRequired));
    }

    #[test]
    fn empty_promo_url_collects_to_none() {
        let mut draft = EditDraft::create();
        draft
            .line_input_mut(BasicField::Title)
            .expect("title input")
            .set_text("Fjord Week");
        draft
            .line_input_mut(BasicField::Slug)
            .expect("slug input")
            .set_text("fjord-week");

        let collected = draft.collect().expect("valid draft");
        assert_eq!(collected.promo_url(), None);
    }
}
