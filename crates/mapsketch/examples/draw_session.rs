//! Walk one headless drawing session: a marker near the default view center and
//! a random polygon, then print the report.

use mapsketch::prelude::*;
use mapsketch::report;

fn main() {
    let view = ViewCfg::default();
    let center = view.center_projected();
    let mut surface = HeadlessSurface::new();
    let mut session = MapSession::new(
        &mut surface,
        ModeToggles {
            marker: true,
            polygon: true,
        },
        MeasureCfg::default(),
    );

    let tok = ReplayToken { seed: 2024, index: 0 };
    let point = draw_point(center, 40.0 * view.resolution(), tok);
    if let Some(ev) = session.surface().finish_point(point) {
        session.handle(&ev);
    }
    let ring = draw_ring_radial(
        RingCfg {
            center,
            ..RingCfg::default()
        },
        tok,
    );
    if let Some(ev) = session.surface().finish_polygon(&ring) {
        session.handle(&ev);
    }

    let state = session.finish();
    print!("{}", report::render(&state));
}
