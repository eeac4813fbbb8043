//! WCS coordinate conversion command

use anyhow::{Context, Result, bail};
use sky_wcs::{Wcs, WcsParams};

use crate::WcsArgs;

pub fn run(args: WcsArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.params)
        .with_context(|| format!("failed to read WCS header: {}", args.params.display()))?;
    let params: WcsParams = serde_json::from_str(&text)
        .with_context(|| format!("invalid WCS header: {}", args.params.display()))?;
    let wcs = Wcs::new(params);

    match (&args.pixel, &args.sky) {
        (Some(pixel), None) => {
            let (x, y) = super::parse_pair(pixel)?;
            let (ra, dec) = wcs.pixel_to_sky(x, y)?;
            println!("pixel ({x}, {y}) -> RA {ra:.6} deg, Dec {dec:.6} deg");
        }
        (None, Some(sky)) => {
            let (ra, dec) = super::parse_pair(sky)?;
            let (x, y) = wcs.sky_to_pixel(ra, dec)?;
            println!("RA {ra} deg, Dec {dec} deg -> pixel ({x:.3}, {y:.3})");
        }
        _ => bail!("pass exactly one of --pixel or --sky"),
    }
    Ok(())
}
