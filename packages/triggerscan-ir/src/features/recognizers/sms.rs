//! SMS domain rules
//!
//! Message-content accessors are pure sources; the comparison sinks live in
//! the boolean (string comparison) chain, which covers `#sms`-tagged
//! receivers.

use super::chain::RecognizerChain;
use super::rules::SourceRule;

const SMS_MESSAGE: &str = "android.telephony.SmsMessage";

pub fn chain() -> RecognizerChain {
    RecognizerChain::new(
        "sms",
        vec![
            Box::new(SourceRule::new(
                "message-body",
                SMS_MESSAGE,
                "getMessageBody",
                "#sms/#body",
            )),
            Box::new(SourceRule::new(
                "display-body",
                SMS_MESSAGE,
                "getDisplayMessageBody",
                "#sms/#body",
            )),
            Box::new(SourceRule::new(
                "originating-address",
                SMS_MESSAGE,
                "getOriginatingAddress",
                "#sms/#sender",
            )),
        ],
    )
}
