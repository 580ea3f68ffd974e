//! A frame-driven projectile spawner built on `recycle_pool`.
//!
//! Every frame the spawner fires a projectile from an object pool and schedules its return
//! a few frames later, while an observable list mirrors which projectiles are in flight.
//! Pool events are logged at `debug` level, so the output shows when the pool has to grow.

use std::convert::Infallible;
use std::time::Duration;

use observable_collections::ObservableList;
use recycle_pool::{
    FrameScheduler, InstanceKey, Instantiate, LocalPool, ObjectPool, PooledHandle, Toggle,
};

const FRAME: Duration = Duration::from_millis(16);
const LIFETIME: Duration = Duration::from_millis(80);
const FRAMES: usize = 12;

#[derive(Clone, Debug)]
struct Projectile {
    damage: u32,
    visible: bool,
    layer: Option<&'static str>,
}

impl Instantiate<&'static str> for Projectile {
    type Error = Infallible;

    fn instantiate(&self, layer: Option<&&'static str>) -> Result<Self, Infallible> {
        Ok(Self {
            layer: layer.copied(),
            ..self.clone()
        })
    }
}

impl Toggle for Projectile {
    fn set_active(&mut self, active: bool) {
        self.visible = active;
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let prototype = Projectile {
        damage: 10,
        visible: true,
        layer: None,
    };

    let Ok(pool) = ObjectPool::from_prototype(prototype, 2, Some("projectiles"));
    let pool = LocalPool::from(pool);
    let scheduler = FrameScheduler::new();

    let mut in_flight = ObservableList::new();
    in_flight.subscribe(|keys: &[InstanceKey]| println!("  in flight: {}", keys.len()));

    let mut handles: Vec<PooledHandle<_>> = Vec::new();

    for frame in 0..FRAMES {
        println!("frame {frame}");

        let handle = pool.acquire_handle();
        handle.with(|projectile| {
            println!(
                "  fired {} dealing {} damage on layer {:?}",
                handle.key(),
                projectile.damage,
                projectile.layer
            );
        });
        handle.return_to_pool_after(LIFETIME, &scheduler);
        in_flight.add(handle.key());
        handles.push(handle);

        scheduler.advance(FRAME);

        // Forget the handles whose projectiles have been recycled this frame.
        let (returned, pending): (Vec<_>, Vec<_>) = handles
            .into_iter()
            .partition(PooledHandle::is_returned);
        handles = pending;

        for handle in returned {
            in_flight.remove(&handle.key());
        }
    }

    println!(
        "created {} projectiles for {FRAMES} shots, {} still in flight",
        pool.len(),
        pool.active_len()
    );
}
