// SPDX-License-Identifier: Apache-2.0

use bno055_uart::{Bno055, Error, Quaternion};

use std::{env, f32::consts::PI, thread::sleep, time::Duration};

const RAD_TO_DEG: f32 = 180f32 / PI;

fn quaternion_to_euler(q: Quaternion) -> [f32; 3] {
    let sqw = q.w * q.w;
    let sqx = q.x * q.x;
    let sqy = q.y * q.y;
    let sqz = q.z * q.z;

    let yaw = (2.0 * (q.x * q.y + q.z * q.w)).atan2(sqx - sqy - sqz + sqw) * RAD_TO_DEG;
    let pitch = (-2.0 * (q.x * q.z - q.y * q.w) / (sqx + sqy + sqz + sqw)).asin() * RAD_TO_DEG;
    let roll = (2.0 * (q.y * q.z + q.x * q.w)).atan2(-sqx - sqy + sqz + sqw) * RAD_TO_DEG;

    [yaw, pitch, roll]
}

fn main() -> Result<(), Error> {
    let path = env::args().nth(1).unwrap_or_else(|| "/dev/ttyUSB0".into());

    let sensor = Bno055::open(&path)?;
    sensor.begin()?;
    println!("sensor up, temperature {} C", sensor.temperature()?);

    loop {
        let q = sensor.refresh_orientation()?;
        let cal = sensor.refresh_calibration()?;
        println!(
            "Orientation: {:?}  cal s{} g{} a{} m{}  health {:.1}%",
            quaternion_to_euler(q),
            cal.system,
            cal.gyroscope,
            cal.accelerometer,
            cal.magnetometer,
            sensor.connection_health()
        );
        sleep(Duration::from_millis(100));
    }
}
