pub mod bar;
pub mod commentary;
pub mod decision;
pub mod fundamentals;
pub mod report;
pub mod signals;

pub use bar::*;
pub use commentary::*;
pub use decision::*;
pub use fundamentals::*;
pub use report::*;
pub use signals::*;
