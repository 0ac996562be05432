// Centralized ingestion limits to harden against untrusted .grp input

// Graph size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_ARCS: usize = 300_000;
