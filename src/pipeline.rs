//! End-to-end assessment: describe a run from explicit inputs, then
//! materialize it into an [`ImpactReport`].
//!
//! [`Assessment::describe`] validates configuration, composites and
//! co-registers the observations, and prepares the asset collections. It does
//! no reductions, so every input problem surfaces before any work starts.
//! [`Assessment::run`] then detects change, fans out one reduction per
//! geometry (and per asset type) over a rayon pool, and joins the results into
//! a single report.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::assets::{classify, AssetCollection, AssetType};
use crate::config::ImpactConfig;
use crate::error::Result;
use crate::geom::AreaOfInterest;
use crate::raster::{detect_change, RasterObservation};
use crate::report::{build_report, estimate_losses, total_flooded_area_km2, ImpactReport, TypeImpact};
use crate::zonal::ReduceParams;

/// Raw inputs as delivered by the imagery and vector collaborators.
#[derive(Debug, Clone, Default)]
pub struct AssessmentInputs {
    /// Pre-event scenes, averaged into one observation.
    pub pre: Vec<RasterObservation>,
    /// Post-event scenes, averaged into one observation.
    pub post: Vec<RasterObservation>,
    assets: BTreeMap<AssetType, AssetCollection>,
}

impl AssessmentInputs {
    pub fn new(pre: Vec<RasterObservation>, post: Vec<RasterObservation>) -> Self {
        Self { pre, post, assets: BTreeMap::new() }
    }

    /// Add an asset collection, replacing any earlier one of the same type.
    pub fn with_assets(mut self, collection: AssetCollection) -> Self {
        self.assets.insert(collection.asset_type(), collection);
        self
    }
}

/// A validated, ready-to-run assessment.
#[derive(Debug, Clone)]
pub struct Assessment {
    config: ImpactConfig,
    aoi: AreaOfInterest,
    params: ReduceParams,
    pre: RasterObservation,
    post: RasterObservation,
    collections: Vec<AssetCollection>,
}

impl Assessment {
    /// Validate `config` and `inputs` and prepare the run.
    ///
    /// Fails with `InputMismatch` if the scenes are not co-registered, and
    /// with `EmptyComposite` if either date has no scenes.
    pub fn describe(config: &ImpactConfig, inputs: AssessmentInputs) -> Result<Self> {
        config.validate()?;
        let aoi = config.aoi()?;
        let params = config.reduce_params()?;

        let pre = RasterObservation::mean_composite(&inputs.pre)?;
        let post = RasterObservation::mean_composite(&inputs.post)?;
        pre.grid().ensure_matches(post.grid())?;

        let mut assets = inputs.assets;
        let collections = config.costs.order.iter()
            .map(|&asset_type| {
                let collection = assets.remove(&asset_type)
                    .map(|c| c.filter_bounds(&aoi))
                    .unwrap_or_else(|| AssetCollection::empty(asset_type));
                match config.limits.limit(asset_type) {
                    Some(limit) => collection.limited(limit),
                    None => collection,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            pre_scenes = inputs.pre.len(),
            post_scenes = inputs.post.len(),
            assets = collections.iter().map(AssetCollection::len).sum::<usize>(),
            "described assessment"
        );
        Ok(Self { config: config.clone(), aoi, params, pre, post, collections })
    }

    #[inline] pub fn config(&self) -> &ImpactConfig { &self.config }

    #[inline] pub fn aoi(&self) -> &AreaOfInterest { &self.aoi }

    /// Prepared collections, one per asset type in report order.
    #[inline] pub fn collections(&self) -> &[AssetCollection] { &self.collections }

    /// Run the pipeline, on a dedicated pool when `reduction.threads` is set.
    pub fn run(&self) -> Result<ImpactReport> {
        match self.config.reduction.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
                pool.install(|| self.materialize())
            }
            None => self.materialize(),
        }
    }

    fn materialize(&self) -> Result<ImpactReport> {
        let mask = detect_change(&self.pre, &self.post, self.config.detection.threshold)?;

        let (area, per_type) = rayon::join(
            || total_flooded_area_km2(&mask, &self.aoi, &self.params),
            || self.collections.par_iter()
                .map(|collection| {
                    let asset_type = collection.asset_type();
                    let classification = classify(collection, &mask, &self.params);
                    TypeImpact {
                        asset_type,
                        assessed: collection.len(),
                        undetermined: classification.undetermined(),
                        losses: estimate_losses(classification.affected(), self.config.costs.unit_cost(asset_type)),
                    }
                })
                .collect::<Vec<_>>(),
        );

        let report = build_report(area?, per_type, &self.config.costs.order, &self.config.costs.currency);
        tracing::info!(
            flooded_area_km2 = report.flooded_area_km2(),
            affected = report.rows().len(),
            total_loss = report.total_loss(),
            currency = report.currency(),
            "assessment complete"
        );
        Ok(report)
    }
}
