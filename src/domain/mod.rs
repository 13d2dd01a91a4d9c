mod budget;
mod category;
mod expense;
mod money;
mod month;
mod user;

pub use budget::*;
pub use category::*;
pub use expense::*;
pub use money::*;
pub use month::*;
pub use user::*;
