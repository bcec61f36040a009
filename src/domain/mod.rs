// Domain layer: models and ports. Persistence lives behind `SubmissionStore`.

pub mod model;
pub mod ports;
