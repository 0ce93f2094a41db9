/// Data layer: file schemas, loading, time conversion and line labels.
///
/// Architecture:
/// ```text
///  <param>_<run>_<variant>.dat
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fixed columns → (timestep, metric series)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   time    │  timestep × time_delta → minutes/hours/days/years
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  label    │  file name tokens → series label
///   └──────────┘
/// ```

pub mod label;
pub mod loader;
pub mod model;
pub mod time;
