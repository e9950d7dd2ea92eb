//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::{bot::BotData, errors::Error};

/// Role application commands
pub mod applications;

/// Economy commands
pub mod economy;

/// Mini-game commands
pub mod games;

/// General utility commands
pub mod general;

/// Lottery commands
pub mod lottery;

/// Moderation and guild settings commands
pub mod moderation;

/// Support ticket commands
pub mod tickets;

// Export commands
pub use applications::*;
pub use economy::*;
pub use games::*;
pub use general::*;
pub use lottery::*;
pub use moderation::*;
pub use tickets::*;

/// Every top-level command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        // General
        ping(),
        help(),
        // Economy
        balance(),
        daily(),
        weekly(),
        monthly(),
        pay(),
        deposit(),
        withdraw(),
        beg(),
        work(),
        jobs(),
        apply(),
        leaderboard(),
        coinflip(),
        dice(),
        slots(),
        profile(),
        setbio(),
        shop(),
        buy(),
        inventory(),
        use_item(),
        rob(),
        reset(),
        badge(),
        lottery(),
        // Moderation
        warn(),
        warnings(),
        warnlimit(),
        jail(),
        jailers(),
        free(),
        kick(),
        ban(),
        mute(),
        unmute(),
        premiumrole(),
        setjailrole(),
        setmuterole(),
        setticketcategory(),
        // Games
        rps(),
        tictactoe(),
        guess(),
        math(),
        trivia(),
        typing_test(),
        // Tickets and applications
        ticket(),
        application(),
    ]
}
