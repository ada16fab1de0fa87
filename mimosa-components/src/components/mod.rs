//! Equation modules, one variant per slot
//!
//! | Slot | Variants |
//! |------|----------|
//! | `economics` | `exogenous` |
//! | `emissions` | `default` |
//! | `mitigation` | `default` |
//! | `industry` | `mac`, `energy` |
//! | `emissiontrade` | `notrade`, `notrade_ce`, `globalprice` |
//! | `damages` | `ad_rice2012`, `coacch` |
//! | `objective` | `globalcosts` |

pub mod damages;
pub mod economics;
pub mod emissions;
pub mod emissiontrade;
pub mod industry;
pub mod mitigation;
pub mod objective;
