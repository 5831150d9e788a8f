//! Double-buffered feedback surfaces.
//!
//! A pair holds two equally sized surfaces. One is read (last frame's
//! output), the other written (this frame's output); `swap` flips the roles
//! once the frame is submitted.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Read,
    Write,
}

#[derive(Debug)]
pub struct FeedbackPair<T> {
    surfaces: [T; 2],
    read: usize,
    swaps: u64,
}

impl<T> FeedbackPair<T> {
    /// `a` starts as the read surface, `b` as the write surface.
    pub fn new(a: T, b: T) -> Self {
        Self {
            surfaces: [a, b],
            read: 0,
            swaps: 0,
        }
    }

    pub fn read(&self) -> &T {
        &self.surfaces[self.read]
    }

    pub fn write(&self) -> &T {
        &self.surfaces[1 - self.read]
    }

    pub fn write_mut(&mut self) -> &mut T {
        &mut self.surfaces[1 - self.read]
    }

    /// Role currently held by surface `index` (0 or 1).
    pub fn role(&self, index: usize) -> Role {
        if index == self.read {
            Role::Read
        } else {
            Role::Write
        }
    }

    pub fn read_index(&self) -> usize {
        self.read
    }

    pub fn swap(&mut self) {
        self.read = 1 - self.read;
        self.swaps += 1;
    }

    /// Number of swaps since allocation.
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Reallocates both surfaces (e.g. on resize). Roles are kept; on error
    /// the pair is left untouched.
    pub fn replace_with<E, F>(&mut self, mut alloc: F) -> Result<(), E>
    where
        F: FnMut(&T) -> Result<T, E>,
    {
        let a = alloc(&self.surfaces[0])?;
        let b = alloc(&self.surfaces[1])?;
        self.surfaces = [a, b];
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.surfaces.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_surface_is_written() {
        let mut pair = FeedbackPair::new("a", "b");
        for _ in 0..5 {
            assert_ne!(pair.role(0), pair.role(1));
            assert_ne!(pair.read(), pair.write());
            pair.swap();
        }
    }

    #[test]
    fn last_write_becomes_next_read() {
        let mut pair = FeedbackPair::new(0u32, 0u32);
        *pair.write_mut() = 7;
        pair.swap();
        assert_eq!(*pair.read(), 7);
        assert_eq!(pair.swaps(), 1);
    }

    #[test]
    fn realloc_keeps_roles() {
        let mut pair = FeedbackPair::new(1u32, 2u32);
        pair.swap();
        pair.replace_with(|v| Ok::<_, ()>(v * 10)).unwrap();
        assert_eq!(*pair.read(), 20);
        assert_eq!(*pair.write(), 10);
        assert_eq!(pair.read_index(), 1);
    }
}
