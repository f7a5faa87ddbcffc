//! Stock move list.

use bevy_motion_macro::moves;

moves! {
    /// The stock move list, in registration order.
    ///
    /// "Super Fireball" shares its first three tokens with "Fireball", and the
    /// single-button normals are prefixes of nothing, so a lone `P` or `K`
    /// always resolves to them.
    pub const DEFAULT_MOVES = {
        "Fireball" => "236P",
        "Shoryu" => "623P",
        "Tatsu" => "214K",
        "The Grab No One Likes" => "63214G",
        "Napalm Shot" => "44446P",
        "Super Fireball" => "236236PP",
        "Punch" => [Punch],
        "Forward Punch" => [Right, Punch],
        "Kick" => [Kick],
        "Forward Kick" => [Right, Kick],
        "Grab" => [Grab],
        "Super Grab" => "236G",
    };
}
