use rover_hardware::{SimulatedEncoder, SimulatedPins, SimulatedPwm};
use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};
use rstest::rstest;

#[rstest]
fn pins_default_high_like_pulled_up_sensors() {
    let mut pins = SimulatedPins::new();
    for pin in [34u8, 35] {
        assert_eq!(pins.read(pin).unwrap(), Level::High);
    }
}

#[rstest]
fn scripted_input_is_visible_to_reader() {
    let mut pins = SimulatedPins::new();
    pins.set_input(34, Level::Low);
    assert_eq!(pins.read(34).unwrap(), Level::Low);
    pins.set_input(34, Level::High);
    assert_eq!(pins.read(34).unwrap(), Level::High);
}

#[rstest]
fn encoder_feed_accumulates_across_clones() {
    let mut enc = SimulatedEncoder::new();
    let feeder = enc.clone();
    feeder.feed(4);
    feeder.feed(4);
    assert_eq!(enc.drain(), 8);
    // Drained: a second drain sees only what arrived afterwards.
    feeder.feed(1);
    assert_eq!(enc.drain(), 1);
}

#[rstest]
fn encoder_drain_is_atomic_under_concurrent_feeding() {
    let mut enc = SimulatedEncoder::new();
    let feeder = enc.clone();
    let producer = std::thread::spawn(move || {
        for _ in 0..1000 {
            feeder.feed(1);
        }
    });
    let mut total = 0u32;
    for _ in 0..100 {
        total += enc.drain();
    }
    producer.join().unwrap();
    total += enc.drain();
    assert_eq!(total, 1000);
}

#[rstest]
#[case(0, 255)]
#[case(1, 0)]
#[case(1, 128)]
fn pwm_duty_readback(#[case] channel: u8, #[case] duty: u8) {
    let mut pwm = SimulatedPwm::new();
    pwm.set_duty(channel, duty).unwrap();
    assert_eq!(pwm.duty(channel), duty);
}
