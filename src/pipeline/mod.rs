//! Pipeline module - feature transforms and the steps that compose them

pub mod compose;
pub mod config;
pub mod encoding;
pub mod error;
pub mod features;
pub mod loader;
pub mod preprocessor;
pub mod record;
pub mod scaling;
pub mod similarity;
pub mod transform;

pub use compose::{ColumnTransformer, FeatureUnion, Pipeline, Remainder};
pub use config::FeatureConfig;
pub use encoding::{OneHotEncoder, OrdinalEncoder};
pub use error::{FeatureError, Result};
pub use features::*;
pub use loader::*;
pub use preprocessor::*;
pub use record::FlightRecord;
pub use scaling::{ScalerParams, StandardScaler};
pub use similarity::{rbf_feature_name, rbf_kernel, RbfPercentileSimilarity, SimilarityConfig};
pub use transform::{Fittable, Step, Transform};
