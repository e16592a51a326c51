//! Cache invalidation shared by structures holding derived mesh data.

/// Anything that caches data derived from the mesh structure (element
/// geometries, index maps, ...) implements this.
pub trait InvalidateCache {
    /// Drop every derived cache so later queries recompute from the records.
    fn invalidate_cache(&mut self);
}
