use crate::config::MembersOrder;
use crate::parser::ApiNode;

/// Order stage of the member pipeline.
///
/// `Source` keeps declaration order. `Alphabetical` sorts by display name
/// with ordinal comparison; the sort is stable so identical names (such as
/// overloads) keep their relative order.
pub fn order_members<'a>(mut members: Vec<&'a ApiNode>, order: MembersOrder) -> Vec<&'a ApiNode> {
    match order {
        MembersOrder::Source => {}
        MembersOrder::Alphabetical => members.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    members
}
