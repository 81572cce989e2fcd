//! Encoder, labeler and reconstructor chained per document.

use super::zones::zones_from_labels;
use crate::error::Result;
use crate::features::{EncoderOptions, FeatureEncoder};
use crate::label::{LabelStream, SequenceLabeler, Taxonomy};
use crate::model::{Document, Zone};
use crate::render::{MarkupOptions, MarkupRenderer, MarkupResult};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Label under which the body zone is stored.
pub const BODY_LABEL: &str = "<body>";

/// Outcome of segmenting one document.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// The labeler output
    pub labels: LabelStream,
    /// Pieces of the document per label
    pub zones: BTreeMap<String, Zone>,
    /// Reconstructed markup
    pub markup: MarkupResult,
}

impl Segmentation {
    /// The zone labeled `label`, if any line got that label.
    pub fn zone(&self, label: &str) -> Option<&Zone> {
        self.zones.get(label)
    }
}

/// Coarse segmentation of whole documents, line by line.
#[derive(Debug, Clone)]
pub struct Segmenter<L> {
    labeler: L,
    encoder: FeatureEncoder,
    markup: MarkupOptions,
}

impl<L: SequenceLabeler> Segmenter<L> {
    /// Create a segmenter with default options and the coarse taxonomy.
    pub fn new(labeler: L) -> Self {
        Self {
            labeler,
            encoder: FeatureEncoder::default(),
            markup: MarkupOptions::new().with_taxonomy(Taxonomy::segmentation()),
        }
    }

    /// Set the encoder options.
    pub fn with_encoder_options(mut self, options: EncoderOptions) -> Self {
        self.encoder = FeatureEncoder::new(options);
        self
    }

    /// Set the markup options.
    pub fn with_markup_options(mut self, options: MarkupOptions) -> Self {
        self.markup = options;
        self
    }

    /// Segment a document.
    ///
    /// Returns `Ok(None)` when the document has no featurable line.
    pub fn segment(&self, doc: &Document) -> Result<Option<Segmentation>> {
        let Some(features) = self.encoder.encode_lines(doc)? else {
            return Ok(None);
        };
        if features.is_empty() {
            log::debug!("no featurable line, skipping segmentation");
            return Ok(None);
        }

        let labels = self.labeler.label_stream(&features.feature_string())?;
        let zones = zones_from_labels(doc, &labels);
        let markup = MarkupRenderer::new(self.markup.clone()).render_lines(doc, &labels)?;
        log::debug!(
            "segmented {} lines into {} zones",
            features.len(),
            zones.len()
        );
        Ok(Some(Segmentation {
            labels,
            zones,
            markup,
        }))
    }

    /// Segment a document and store the zones in it.
    pub fn segment_in_place(&self, doc: &mut Document) -> Result<Option<MarkupResult>> {
        match self.segment(doc)? {
            Some(segmentation) => {
                doc.set_zones(segmentation.zones);
                Ok(Some(segmentation.markup))
            }
            None => Ok(None),
        }
    }

    /// Segment independent documents in parallel, one result per document.
    pub fn segment_batch(&self, docs: &[Document]) -> Vec<Result<Option<Segmentation>>>
    where
        L: Sync,
    {
        docs.par_iter().map(|doc| self.segment(doc)).collect()
    }
}

/// Token-level labeling of one zone, typically the body.
#[derive(Debug, Clone)]
pub struct BodySegmenter<L> {
    labeler: L,
    encoder: FeatureEncoder,
    markup: MarkupOptions,
}

impl<L: SequenceLabeler> BodySegmenter<L> {
    /// Create a body segmenter with default options and the body taxonomy.
    pub fn new(labeler: L) -> Self {
        Self {
            labeler,
            encoder: FeatureEncoder::default(),
            markup: MarkupOptions::new().with_taxonomy(Taxonomy::body_segmentation()),
        }
    }

    /// Set the encoder options.
    pub fn with_encoder_options(mut self, options: EncoderOptions) -> Self {
        self.encoder = FeatureEncoder::new(options);
        self
    }

    /// Set the markup options.
    pub fn with_markup_options(mut self, options: MarkupOptions) -> Self {
        self.markup = options;
        self
    }

    /// Label the tokens of `zone` and reconstruct them.
    ///
    /// Returns `Ok(None)` when the zone has no content.
    pub fn process(&self, doc: &Document, zone: &Zone) -> Result<Option<MarkupResult>> {
        let Some(features) = self.encoder.encode_tokens(doc, zone)? else {
            return Ok(None);
        };
        if features.is_empty() {
            log::debug!("zone without visible tokens, skipping labeling");
            return Ok(None);
        }

        let labels = self.labeler.label_stream(&features.feature_string())?;
        let markup = MarkupRenderer::new(self.markup.clone()).render_tokens(&features.tokens, &labels)?;
        Ok(Some(markup))
    }

    /// Process the body zone stored in `doc` by a previous segmentation.
    pub fn process_body(&self, doc: &Document) -> Result<Option<MarkupResult>> {
        match doc.zone(BODY_LABEL) {
            Some(zone) => self.process(doc, zone),
            None => {
                log::debug!("document has no body zone");
                Ok(None)
            }
        }
    }
}
