// Concurrent Cuckoo Hash Set Implementation
// A two-table cuckoo hash set storing full values in short bounded buckets,
// with fine-grained striped reentrant locking for contains/add/remove and a
// stop-the-world resize that re-salts the hash functions and rebuilds the
// table while every other operation is excluded.

use derive_builder::Builder;
use rand::Rng;
use std::cell::UnsafeCell;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::hint;
use std::marker::PhantomData;
use std::mem;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Maximum number of spin-loop iterations before parking a thread.
/// Spinning avoids kernel calls for short waits; parking avoids wasting CPU
/// on long ones.
const MAX_SPIN: usize = 100;

/// Hard upper bound on the number of values a single bucket may hold.
const PROBE_SIZE: usize = 8;

/// Soft bucket target. An insertion that lands in a bucket at or above this
/// length starts a displacement chain instead of a plain append.
const THRESHOLD: usize = PROBE_SIZE / 2;

/// Owner token of an unheld stripe lock.
const UNOWNED: usize = 0;

/// Error type for bulk-loading the set
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Returned when `populate` encounters a value that is already present
    #[error("value is already present in the set")]
    AlreadyPresent,
}

/// Address of a thread-local, used as a non-zero per-thread owner token.
fn thread_token() -> usize {
    thread_local! {
        static TOKEN: u8 = const { 0 };
    }
    TOKEN.with(|token| token as *const u8 as usize)
}

/// A reentrant mutex guarding one lock stripe.
///
/// This is not a full mutex implementation but the minimal reentrant lock the
/// displacement protocol needs, built directly on the parking lot:
///
/// - **Ownership** is a single atomic word holding the owner's thread token
///   (`UNOWNED` when free). Acquisition is a compare-exchange loop that spins
///   up to `MAX_SPIN` times and then parks the thread, keyed on the address
///   of the owner word.
/// - **Reentrancy** is a depth counter beside the owner word. Only the owning
///   thread ever touches the depth, so it needs no ordering of its own. The
///   same thread may re-acquire a stripe it already holds; this happens when
///   a displacement chain claims a victim whose stripe the thread took while
///   peeking, and when the resizer, holding every row-0 stripe, runs
///   insertions that claim stripes again.
///
/// The final release stores `UNOWNED` with release ordering and unparks one
/// waiter. A waiter that finds the lock already free when it is about to park
/// is turned away by the park validation closure and retries immediately.
struct StripeLock {
    /// Thread token of the current owner, or `UNOWNED`.
    owner: AtomicUsize,
    /// Re-acquisition depth; written only by the owning thread.
    depth: AtomicUsize,
}

impl StripeLock {
    fn new() -> Self {
        Self {
            owner: AtomicUsize::new(UNOWNED),
            depth: AtomicUsize::new(0),
        }
    }

    /// Acquire the stripe, blocking until it is free or already ours.
    fn lock(&self) -> StripeGuard<'_> {
        let me = thread_token();
        // Only this thread ever stores its own token, so observing it means
        // the lock is held by us and the depth is ours to bump.
        if self.owner.load(Ordering::Relaxed) == me {
            let depth = self.depth.load(Ordering::Relaxed);
            self.depth.store(depth + 1, Ordering::Relaxed);
            return StripeGuard { lock: self };
        }
        let mut retry = 0;
        while self
            .owner
            .compare_exchange_weak(UNOWNED, me, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            self.spin_or_park(&mut retry);
        }
        self.depth.store(1, Ordering::Relaxed);
        StripeGuard { lock: self }
    }

    fn unlock(&self) {
        let depth = self.depth.load(Ordering::Relaxed);
        if depth > 1 {
            self.depth.store(depth - 1, Ordering::Relaxed);
            return;
        }
        self.depth.store(0, Ordering::Relaxed);
        self.owner.store(UNOWNED, Ordering::Release);
        unsafe {
            parking_lot_core::unpark_one(self.owner.as_ptr() as usize, |_| {
                parking_lot_core::DEFAULT_UNPARK_TOKEN
            });
        }
    }

    /// Spin or park the thread while the stripe is held elsewhere.
    fn spin_or_park(&self, retry: &mut usize) {
        if *retry > MAX_SPIN {
            *retry = 0;
            unsafe {
                parking_lot_core::park(
                    self.owner.as_ptr() as usize,
                    || self.owner.load(Ordering::Relaxed) != UNOWNED,
                    || (),
                    |_, _| (),
                    parking_lot_core::DEFAULT_PARK_TOKEN,
                    None,
                );
            }
        } else {
            *retry += 1;
            hint::spin_loop();
        }
    }
}

/// Releases one level of a `StripeLock` when dropped.
struct StripeGuard<'a> {
    lock: &'a StripeLock,
}

impl Drop for StripeGuard<'_> {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

/// The pair of stripe locks covering one table column, or one value's two
/// candidate columns. Acquisition order is fixed: row 0 first, then row 1.
struct Stripes<'a> {
    _row0: StripeGuard<'a>,
    _row1: StripeGuard<'a>,
}

impl<'a> Stripes<'a> {
    fn acquire(row0: &'a StripeLock, row1: &'a StripeLock) -> Self {
        let first = row0.lock();
        let second = row1.lock();
        Stripes {
            _row0: first,
            _row1: second,
        }
    }
}

/// Both stripe locks covering a value, plus the table geometry observed while
/// they were taken. Holding a `Claim` pins the buckets at `slots` for the
/// claimed value: no other thread can touch them, and no resize can start.
struct Claim<'a> {
    /// Bucket index of the value in each row, under `capacity`.
    slots: [usize; 2],
    /// Rebuild counter at acquisition time.
    epoch: usize,
    /// Buckets per row at acquisition time.
    capacity: usize,
    _stripes: Stripes<'a>,
}

impl Claim<'_> {
    fn slot(&self, row: usize) -> usize {
        self.slots[row]
    }
}

/// Outcome of a single locked insertion attempt.
enum Placement<T> {
    /// Appended below the bucket threshold; nothing further to do.
    Inserted,
    /// The value was already in one of its candidate buckets.
    AlreadyPresent,
    /// Appended into an over-threshold bucket; the caller must run a
    /// displacement chain starting at `(row, index)`.
    Displaced {
        row: usize,
        index: usize,
        epoch: usize,
        capacity: usize,
    },
    /// Both candidate buckets are at `PROBE_SIZE`; the value is handed back
    /// and the caller must grow the table.
    Full { value: T, capacity: usize },
}

/// The boost `hash_combine` mixer over 64-bit words.
fn mix(seed: u64, word: u64) -> u64 {
    seed ^ (word
        .wrapping_add(0x9e37_79b9)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2))
}

fn empty_rows<T>(capacity: usize) -> [Box<[UnsafeCell<Vec<T>>]>; 2] {
    std::array::from_fn(|_| (0..capacity).map(|_| UnsafeCell::new(Vec::new())).collect())
}

fn stripe_row(count: usize) -> Box<[StripeLock]> {
    (0..count).map(|_| StripeLock::new()).collect()
}

/// A concurrent hash set built on two-table cuckoo hashing with striped
/// reentrant locks.
///
/// ## What Makes It "Cuckoo"
///
/// Every value has exactly two candidate buckets, one per table row, chosen
/// by two independently salted hash functions. When an insertion finds both
/// candidates crowded, the oldest occupant of the fuller bucket is displaced
/// into its own alternate bucket, which may displace another occupant in
/// turn. A chain that runs too long forces the table to grow.
///
/// ## Algorithm Overview
///
/// 1. **Buckets**: each bucket holds at most `PROBE_SIZE` (8) values. Up to
///    `THRESHOLD` (4) a bucket accepts appends directly; between the two a
///    bucket is usable but triggers displacement; at `PROBE_SIZE` it is full.
/// 2. **Lock stripes**: a `2 × L` grid of reentrant locks, where `L` is the
///    capacity at construction. The grid never grows. A bucket at row `r`,
///    index `i` is guarded by stripe `(r, i mod L)`; as the table grows each
///    stripe simply guards more buckets.
/// 3. **Per-value locking**: an operation on value `v` takes the row-0 stripe
///    for `v`, then the row-1 stripe, always in that order, which covers both
///    of `v`'s candidate buckets. Deadlock is impossible because every thread
///    orders its two acquisitions by row, and no thread waits on a row-0
///    stripe while holding a row-1 stripe.
/// 4. **Resize**: growth doubles the bucket count, redraws both hash salts,
///    and reinserts every value. The resizer takes *all* row-0 stripes in
///    index order; since every other operation needs its row-0 stripe first,
///    the resizer ends up with exclusive use of the whole table. Reinsertion
///    never re-enters the resize: a stuck displacement chain redraws the
///    salts and redoes the pass instead.
/// 5. **Validation**: hashes are computed before locking, so a resize may
///    slip in between. Operations record the rebuild epoch, revalidate it
///    once their stripes are held, and retry with fresh hashes if the table
///    moved underneath them.
///
/// ## Concurrency Model
///
/// - `contains`, `add`, and `remove` are safe to call from any number of
///   threads and are linearizable per value.
/// - `len` is advisory while writers are active and exact once they quiesce.
/// - `populate` is a plain single-threaded bulk loader meant to run before
///   the set is shared.
///
/// Progress is blocking: operations wait on stripe locks and a resize
/// excludes everything else for its duration. Displacement work per
/// insertion is bounded by a chain limit that doubles along with the
/// capacity.
#[derive(Builder)]
#[builder(
    pattern = "owned",
    build_fn(private, name = "base_build", validate = "Self::validate")
)]
pub struct CuckooSet<T, H = DefaultHasher>
where
    H: Hasher + Default,
{
    /// Buckets per row at construction. Also fixes the stripe count for the
    /// lifetime of the set.
    #[builder(default = "1024")]
    initial_capacity: usize,

    // Internal state - initialized by `build`, mutated only under locks
    /// Current buckets per row; doubles on every rebuild.
    #[builder(setter(skip))]
    capacity: AtomicUsize,

    /// Displacement-chain budget per insertion; doubles with the capacity.
    #[builder(setter(skip))]
    limit: AtomicUsize,

    /// Seed mixed into the row-0 hash; redrawn on every rebuild.
    #[builder(setter(skip))]
    salt0: AtomicU64,

    /// Seed mixed into the row-1 hash; redrawn on every rebuild.
    #[builder(setter(skip))]
    salt1: AtomicU64,

    /// Completed-rebuild counter. Operations hash before locking and
    /// revalidate this afterwards to detect a table swap.
    #[builder(setter(skip))]
    epoch: AtomicUsize,

    /// Advisory element count; exact only in a quiescent state.
    #[builder(setter(skip))]
    len: AtomicUsize,

    /// The two bucket rows. A bucket is only touched under the stripe lock
    /// covering it, and the array itself is only swapped while every row-0
    /// stripe is held.
    #[builder(setter(skip))]
    table: UnsafeCell<[Box<[UnsafeCell<Vec<T>>]>; 2]>,

    /// One reentrant lock per row and stripe; never resized.
    #[builder(setter(skip))]
    locks: [Box<[StripeLock]>; 2],

    /// Phantom data for the hasher type
    #[builder(setter(skip))]
    _hasher: PhantomData<H>,
}

// SAFETY: every bucket is read or written only while the stripe lock covering
// it is held by the accessing thread, and the bucket array itself is only
// replaced while every row-0 stripe is held, which excludes all other
// operations. Values cross threads (inserted on one, dropped on another),
// hence `T: Send`. No `&T` into the table ever escapes the locks.
unsafe impl<T: Send, H: Hasher + Default> Sync for CuckooSet<T, H> {}

impl<T, H> CuckooSet<T, H>
where
    T: Hash + Eq + Clone,
    H: Hasher + Default,
{
    /// Check whether `value` is in the set.
    pub fn contains(&self, value: &T) -> bool {
        let claim = self.claim(value);
        (0..2).any(|row| {
            // SAFETY: `claim` holds the stripes covering both candidate buckets.
            unsafe { self.bucket(row, claim.slot(row)) }
                .iter()
                .any(|x| x == value)
        })
    }

    /// Insert `value` into the set.
    ///
    /// Returns true if the value was inserted, false if it was already
    /// present. An insertion into a crowded bucket may displace older values
    /// into their alternate buckets, and may grow the table when displacement
    /// cannot make room; both are invisible to the caller.
    pub fn add(&self, value: T) -> bool {
        let mut value = value;
        loop {
            value = match self.try_add(value) {
                Placement::Inserted => {
                    self.len.fetch_add(1, Ordering::Release);
                    return true;
                }
                Placement::AlreadyPresent => return false,
                Placement::Displaced {
                    row,
                    index,
                    epoch,
                    capacity,
                } => {
                    self.len.fetch_add(1, Ordering::Release);
                    if !self.relocate(row, index, epoch) {
                        self.resize(capacity);
                    }
                    return true;
                }
                Placement::Full { value, capacity } => {
                    self.resize(capacity);
                    value
                }
            };
        }
    }

    /// Remove `value` from the set.
    ///
    /// Returns true if the value was present and has been removed.
    pub fn remove(&self, value: &T) -> bool {
        let claim = self.claim(value);
        for row in 0..2 {
            // SAFETY: `claim` holds the stripes covering both candidate buckets.
            let bucket = unsafe { self.bucket(row, claim.slot(row)) };
            if let Some(at) = bucket.iter().position(|x| x == value) {
                bucket.remove(at);
                self.len.fetch_sub(1, Ordering::Release);
                return true;
            }
        }
        false
    }

    /// Number of values in the set.
    ///
    /// Advisory while other threads are mutating the set; exact once they
    /// have quiesced.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current number of buckets per row. Starts at the construction
    /// capacity and doubles on every rebuild.
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Bulk-load the set, stopping at the first value that is already
    /// present. Values inserted before the duplicate remain in the set.
    ///
    /// Meant for single-threaded setup before the set is shared.
    pub fn populate<I>(&self, entries: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        for value in entries {
            if !self.add(value) {
                return Err(Error::AlreadyPresent);
            }
        }
        Ok(())
    }

    /// Compute the two salted hashes of a value.
    ///
    /// One base hash is taken with the configured hasher and folded with each
    /// row's salt, so the rows stay independent as long as the base hash is
    /// well mixed, and both change whenever the salts are redrawn.
    fn hashes(&self, value: &T) -> (u64, u64) {
        let mut hasher = H::default();
        value.hash(&mut hasher);
        let base = hasher.finish();
        let h0 = mix(mix(0, base), self.salt0.load(Ordering::Relaxed));
        let h1 = mix(mix(0, base), self.salt1.load(Ordering::Relaxed));
        (h0, h1)
    }

    /// Redraw both salts, folding fresh randomness into the old values.
    fn reseed(&self, rng: &mut impl Rng) {
        self.salt0.store(
            mix(self.salt0.load(Ordering::Relaxed), rng.random::<u64>()),
            Ordering::Relaxed,
        );
        self.salt1.store(
            mix(self.salt1.load(Ordering::Relaxed), rng.random::<u64>()),
            Ordering::Relaxed,
        );
    }

    /// Lock both stripes covering `value` and pin its candidate buckets.
    ///
    /// Hashing happens before the stripes are taken, so a resize can complete
    /// in between and silently remap the value to different stripes and
    /// buckets. The epoch is reloaded once the stripes are held; on mismatch
    /// the stale stripes are released and the whole step repeats with fresh
    /// hashes.
    fn claim(&self, value: &T) -> Claim<'_> {
        loop {
            let epoch = self.epoch.load(Ordering::Acquire);
            let capacity = self.capacity.load(Ordering::Relaxed);
            let (h0, h1) = self.hashes(value);
            let stripes = self.locks[0].len();
            let held = Stripes::acquire(
                &self.locks[0][h0 as usize % stripes],
                &self.locks[1][h1 as usize % stripes],
            );
            if self.epoch.load(Ordering::Acquire) == epoch {
                return Claim {
                    slots: [h0 as usize % capacity, h1 as usize % capacity],
                    epoch,
                    capacity,
                    _stripes: held,
                };
            }
            // the table was rebuilt in between; hashes and stripes are stale
        }
    }

    /// Fetch the bucket at `(row, index)`.
    ///
    /// # Safety
    ///
    /// The stripe lock covering `(row, index)` must be held by the calling
    /// thread, and the returned reference must not outlive that hold.
    #[allow(clippy::mut_from_ref)]
    unsafe fn bucket(&self, row: usize, index: usize) -> &mut Vec<T> {
        let rows = unsafe { &*self.table.get() };
        unsafe { &mut *rows[row][index].get() }
    }

    /// One locked insertion attempt: duplicate check, then the first bucket
    /// with room, preferring buckets below `THRESHOLD`.
    fn try_add(&self, value: T) -> Placement<T> {
        let claim = self.claim(&value);
        // SAFETY: `claim` holds the stripes covering both candidate buckets.
        let b0 = unsafe { self.bucket(0, claim.slot(0)) };
        let b1 = unsafe { self.bucket(1, claim.slot(1)) };
        if b0.contains(&value) || b1.contains(&value) {
            return Placement::AlreadyPresent;
        }
        if b0.len() < THRESHOLD {
            b0.push(value);
            Placement::Inserted
        } else if b1.len() < THRESHOLD {
            b1.push(value);
            Placement::Inserted
        } else if b0.len() < PROBE_SIZE {
            b0.push(value);
            Placement::Displaced {
                row: 0,
                index: claim.slot(0),
                epoch: claim.epoch,
                capacity: claim.capacity,
            }
        } else if b1.len() < PROBE_SIZE {
            b1.push(value);
            Placement::Displaced {
                row: 1,
                index: claim.slot(1),
                epoch: claim.epoch,
                capacity: claim.capacity,
            }
        } else {
            Placement::Full {
                value,
                capacity: claim.capacity,
            }
        }
    }

    /// Drain an over-threshold bucket by migrating its front value to the
    /// other row, chasing overflow for up to `limit` rounds.
    ///
    /// Each round peeks the front of the current bucket under that column's
    /// stripes, then re-claims the victim by value. The victim may have been
    /// removed or moved in the window between peek and claim; if its old
    /// bucket has meanwhile drained below `THRESHOLD` the chain is done, and
    /// if the table was rebuilt the chain is moot. Returns false when the
    /// chain ran out of rounds or hit a full alternate bucket, in which case
    /// the caller must grow the table.
    fn relocate(&self, row: usize, index: usize, epoch: usize) -> bool {
        let mut row = row;
        let mut index = index;
        let rounds = self.limit.load(Ordering::Relaxed);
        for _ in 0..rounds {
            let victim = {
                let stripe = index % self.locks[0].len();
                let _held = Stripes::acquire(&self.locks[0][stripe], &self.locks[1][stripe]);
                if self.epoch.load(Ordering::Acquire) != epoch {
                    return true;
                }
                // SAFETY: `_held` covers column `index` in both rows.
                match unsafe { self.bucket(row, index) }.first() {
                    Some(front) => front.clone(),
                    // emptied by concurrent removes
                    None => return true,
                }
            };

            let claim = self.claim(&victim);
            if claim.epoch != epoch {
                return true;
            }
            let dest_row = 1 - row;
            let dest_index = claim.slot(dest_row);
            // SAFETY: the victim hashed to `(row, index)` when it was peeked
            // and the epoch has not moved, so `claim` covers the source
            // bucket as well as the destination.
            let source = unsafe { self.bucket(row, index) };
            match source.iter().position(|x| *x == victim) {
                // a concurrent remove already relieved the bucket
                None if source.len() < THRESHOLD => return true,
                None => continue,
                Some(at) => {
                    let value = source.remove(at);
                    let dest = unsafe { self.bucket(dest_row, dest_index) };
                    if dest.len() < THRESHOLD {
                        dest.push(value);
                        return true;
                    } else if dest.len() < PROBE_SIZE {
                        // the destination becomes the next bucket to drain
                        dest.push(value);
                        row = dest_row;
                        index = dest_index;
                    } else {
                        // no room on either side: undo and force a rebuild
                        source.push(value);
                        return false;
                    }
                }
            }
        }
        false
    }

    /// Double the table, redraw the salts, and reinsert every value.
    ///
    /// Takes every row-0 stripe in index order. Ordinary operations acquire
    /// their row-0 stripe before anything else, so once all of row 0 is held
    /// no other thread can be touching any bucket. `observed_capacity` is the
    /// capacity the caller saw when it decided to grow; if it no longer
    /// matches, another thread already resized and there is nothing to do.
    fn resize(&self, observed_capacity: usize) {
        let _held: Vec<StripeGuard<'_>> = self.locks[0].iter().map(StripeLock::lock).collect();
        if self.capacity.load(Ordering::Relaxed) != observed_capacity {
            return;
        }
        let mut rng = rand::rng();
        self.reseed(&mut rng);
        let new_capacity = observed_capacity * 2;
        self.capacity.store(new_capacity, Ordering::Relaxed);
        self.limit.store(new_capacity / 2, Ordering::Relaxed);

        let old_rows = {
            // SAFETY: every row-0 stripe is held; the table is ours alone.
            let rows = unsafe { &mut *self.table.get() };
            mem::replace(rows, empty_rows(new_capacity))
        };
        let mut pending: Vec<T> = old_rows
            .into_iter()
            .flat_map(|row| row.into_vec())
            .flat_map(UnsafeCell::into_inner)
            .collect();

        while let Some(value) = pending.pop() {
            if let Err(value) = self.insert_exclusive(value) {
                // A displacement chain got stuck even with the doubled
                // capacity. Redo the whole pass under fresh salts rather
                // than growing again from inside the rebuild.
                pending.push(value);
                self.reseed(&mut rng);
                // SAFETY: the row-0 stripes are still held.
                let rows = unsafe { &mut *self.table.get() };
                for row in rows.iter_mut() {
                    for bucket in row.iter_mut() {
                        pending.append(bucket.get_mut());
                    }
                }
            }
        }
        self.epoch.fetch_add(1, Ordering::Release);
    }

    /// Reinsert one value while the resizer holds the whole table.
    ///
    /// Runs the ordinary insertion and displacement machinery; the stripe
    /// claims inside re-enter row-0 stripes the resizer already holds, which
    /// is what the locks are reentrant for. Never resizes: a failed chain
    /// hands the value back so the caller can redraw the salts and retry.
    fn insert_exclusive(&self, value: T) -> Result<(), T> {
        let probe = value.clone();
        match self.try_add(value) {
            Placement::Inserted | Placement::AlreadyPresent => Ok(()),
            Placement::Displaced {
                row, index, epoch, ..
            } => {
                if self.relocate(row, index, epoch) {
                    return Ok(());
                }
                // The chain failed with the value parked in one of its
                // candidate buckets; pull it back out for the retry pass.
                let claim = self.claim(&probe);
                for side in 0..2 {
                    // SAFETY: `claim` covers both candidate buckets.
                    let bucket = unsafe { self.bucket(side, claim.slot(side)) };
                    if let Some(at) = bucket.iter().position(|x| *x == probe) {
                        return Err(bucket.remove(at));
                    }
                }
                Err(probe)
            }
            Placement::Full { value, .. } => Err(value),
        }
    }
}

impl<T: Hash + Eq + Clone> CuckooSet<T, DefaultHasher> {
    /// Create a new CuckooSetBuilder with default settings
    pub fn builder() -> CuckooSetBuilder<T, DefaultHasher> {
        CuckooSetBuilder::default()
    }

    /// Create a new CuckooSet with default settings
    pub fn new() -> CuckooSet<T, DefaultHasher> {
        Self::builder().build().unwrap()
    }

    /// Create a new CuckooSet with the specified initial capacity
    pub fn with_capacity(capacity: usize) -> CuckooSet<T, DefaultHasher> {
        Self::builder().initial_capacity(capacity).build().unwrap()
    }
}

impl<T: Hash + Eq + Clone> Default for CuckooSet<T, DefaultHasher> {
    /// Create a new CuckooSet with default settings
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H: Hasher + Default> fmt::Debug for CuckooSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooSet")
            .field("capacity", &self.capacity.load(Ordering::Relaxed))
            .field("stripes", &self.locks[0].len())
            .field("len", &self.len.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T, H: Hasher + Default> CuckooSetBuilder<T, H> {
    /// Validate the builder configuration
    fn validate(&self) -> Result<(), String> {
        if self.initial_capacity == Some(0) {
            return Err("initial_capacity must be greater than zero".into());
        }
        Ok(())
    }

    /// Build a CuckooSet with the specified configuration
    pub fn build(self) -> Result<CuckooSet<T, H>, CuckooSetBuilderError> {
        let mut set = self.base_build()?;
        let capacity = set.initial_capacity;
        let mut rng = rand::rng();
        set.capacity = AtomicUsize::new(capacity);
        set.limit = AtomicUsize::new(capacity / 2);
        set.salt0 = AtomicU64::new(rng.random());
        set.salt1 = AtomicU64::new(rng.random());
        set.table = UnsafeCell::new(empty_rows(capacity));
        set.locks = [stripe_row(capacity), stripe_row(capacity)];
        Ok(set)
    }
}
