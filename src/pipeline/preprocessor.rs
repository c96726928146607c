//! Default preprocessor for the flight booking schema

use polars::prelude::*;

use super::compose::{ColumnTransformer, FeatureUnion, Pipeline, Remainder};
use super::config::FeatureConfig;
use super::encoding::{OneHotEncoder, OrdinalEncoder};
use super::error::Result;
use super::features::{DateFeatures, DirectFlight, InfoPresence, NorthFlag};
use super::scaling::StandardScaler;
use super::similarity::RbfPercentileSimilarity;
use super::transform::Step;

/// Raw columns the flight preprocessor consumes.
pub const FLIGHT_COLUMNS: [&str; 9] = [
    "airline",
    "date_of_journey",
    "source",
    "destination",
    "dep_time",
    "arrival_time",
    "duration",
    "total_stops",
    "additional_info",
];

/// Assemble the column-routed preprocessor for raw flight bookings.
///
/// | route      | columns                     | steps                                           |
/// |------------|-----------------------------|-------------------------------------------------|
/// | `air`      | airline                     | one-hot                                         |
/// | `doj`      | date_of_journey             | calendar features, standard scaling             |
/// | `location` | source, destination         | one-hot + north flag                            |
/// | `time`     | dep_time, arrival_time      | part of day, one-hot                            |
/// | `dur`      | duration                    | rbf similarity + category + over flag + scaling |
/// | `stops`    | total_stops                 | direct flight flag                              |
/// | `info`     | additional_info             | info presence flag                              |
pub fn flight_preprocessor(config: &FeatureConfig) -> Result<ColumnTransformer> {
    config.validate()?;

    let air = Pipeline::new("air").with_step("encoder", Step::fittable(OneHotEncoder::new()));

    let doj = Pipeline::new("doj")
        .with_step("dates", Step::stateless(DateFeatures))
        .with_step("scaler", Step::fittable(StandardScaler::new()));

    let location = Pipeline::new("location").with_step(
        "union",
        Step::fittable(
            FeatureUnion::new("location")
                .with_branch("encoder", Step::fittable(OneHotEncoder::new()))
                .with_branch("north", Step::stateless(NorthFlag)),
        ),
    );

    let time = Pipeline::new("time")
        .with_step("part_of_day", Step::stateless(config.part_of_day))
        .with_step("encoder", Step::fittable(OneHotEncoder::new()));

    let duration_cat = Pipeline::new("duration_cat")
        .with_step("category", Step::stateless(config.duration))
        .with_step(
            "encoder",
            Step::stateless(OrdinalEncoder::new(["short", "medium", "long"])?),
        );

    let dur = Pipeline::new("dur").with_step(
        "union",
        Step::fittable(
            FeatureUnion::new("dur")
                .with_branch(
                    "rbf",
                    Step::fittable(RbfPercentileSimilarity::new(config.similarity.clone())?),
                )
                .with_branch("category", Step::fittable(duration_cat))
                .with_branch("over", Step::stateless(config.long_duration))
                .with_branch("scaler", Step::fittable(StandardScaler::new())),
        ),
    );

    let stops = Pipeline::new("stops").with_step("direct", Step::stateless(DirectFlight));
    let info = Pipeline::new("info").with_step("have_info", Step::stateless(InfoPresence));

    Ok(ColumnTransformer::new()
        .with_remainder(Remainder::Drop)
        .with_route("air", ["airline"], air)
        .with_route("doj", ["date_of_journey"], doj)
        .with_route("location", ["source", "destination"], location)
        .with_route("time", ["dep_time", "arrival_time"], time)
        .with_route("dur", ["duration"], dur)
        .with_route("stops", ["total_stops"], stops)
        .with_route("info", ["additional_info"], info))
}

/// Names of [`FLIGHT_COLUMNS`] absent from `df`.
pub fn missing_flight_columns(df: &DataFrame) -> Vec<&'static str> {
    FLIGHT_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect()
}
