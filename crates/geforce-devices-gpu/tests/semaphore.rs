mod common;

use common::{new_test_device, TEST_VRAM_BYTES};
use geforce_devices_gpu::dispatch::SET_OBJECT;
use geforce_devices_gpu::{
    fifo_intr_bits, kelvin, mmio, push1, surf2d, Command, DispatchError, EngineClass, McIntr,
    NullCommandFetch, QueuedCommandFetch, VramRegion,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const KELVIN: u32 = 0x97;

#[test]
fn semaphore_release_lands_in_vram() {
    let (mut dev, _, _) = new_test_device();
    dev.execute_d3d_command(0, kelvin::method::SEMAPHORE_OBJECT, 0x8000)
        .unwrap();
    dev.execute_d3d_command(0, kelvin::method::SEMAPHORE_OFFSET, 0x10)
        .unwrap();
    dev.execute_d3d_command(0, kelvin::method::SEMAPHORE_ACQUIRE, 0x1234_5678)
        .unwrap();

    assert_eq!(dev.vram().read_u32(0x8010).unwrap(), 0x1234_5678);
    // Only the target dword changes.
    assert_eq!(dev.vram().read_u32(0x800c).unwrap(), 0);
    assert_eq!(dev.vram().read_u32(0x8014).unwrap(), 0);
    // The acquire does not latch anything on the channel.
    let d3d = &dev.channel(0).unwrap().d3d;
    assert_eq!((d3d.semaphore_obj, d3d.semaphore_offset), (0x8000, 0x10));
}

#[test]
fn semaphore_out_of_range_is_dropped() {
    let (mut dev, _, _) = new_test_device();
    let obj = TEST_VRAM_BYTES as u32 - 2;
    dev.execute_d3d_command(3, kelvin::method::SEMAPHORE_OBJECT, obj)
        .unwrap();
    assert_eq!(
        dev.execute_d3d_command(3, kelvin::method::SEMAPHORE_ACQUIRE, 0xffff_ffff),
        Ok(())
    );
    assert_eq!(dev.vram().read_u32(TEST_VRAM_BYTES - 4).unwrap(), 0);
}

#[test]
fn engine_command_by_class() {
    let (mut dev, _, _) = new_test_device();
    dev.execute_engine_command(7, 2, KELVIN, kelvin::method::SURFACE_FORMAT, 0x3)
        .unwrap();
    dev.execute_engine_command(7, 5, 0x62, surf2d::method::OFFSET_DESTIN, 0x0040_0000)
        .unwrap();

    let ch = dev.channel(7).unwrap();
    assert_eq!(ch.d3d.surface_format, 0x3);
    assert_eq!(ch.d3d.color_bytes, 2);
    assert_eq!(ch.surf2d.offset_destin, 0x0040_0000);

    assert_eq!(
        dev.execute_engine_command(7, 0, 0x5f, 0x0300, 1),
        Err(DispatchError::UnknownEngineClass(0x5f))
    );
    assert_eq!(
        dev.execute_engine_command(7, 9, KELVIN, kelvin::method::SURFACE_PITCH, 1),
        Err(DispatchError::InvalidSubchannel(9))
    );
}

#[test]
fn bound_subchannel_routing() {
    let (mut dev, _, _) = new_test_device();
    dev.execute_command(&Command::new(1, 3, EngineClass::Surface2d, SET_OBJECT, 0x42))
        .unwrap();
    assert_eq!(dev.bound_engine(1, 3), Some(EngineClass::Surface2d));
    assert_eq!(dev.bound_engine(1, 4), None);
    assert_eq!(dev.bound_engine(40, 0), None);

    dev.execute_bound_command(1, 3, surf2d::method::PITCH, 0x0800_0800)
        .unwrap();
    assert_eq!(dev.channel(1).unwrap().surf2d.pitch, 0x0800_0800);
    assert_eq!(
        dev.execute_bound_command(1, 4, surf2d::method::PITCH, 0),
        Err(DispatchError::UnboundSubchannel {
            channel: 1,
            subchannel: 4
        })
    );
}

#[test]
fn clear_surface_invalidates_display() {
    let (mut dev, _, display) = new_test_device();
    dev.execute_d3d_command(2, kelvin::method::COLOR_CLEAR_VALUE, 0xff00_00ff)
        .unwrap();
    assert_eq!(display.count(), 0);

    dev.execute_d3d_command(2, kelvin::method::CLEAR_SURFACE, 0xf0)
        .unwrap();
    dev.execute_d3d_command(2, kelvin::method::CLEAR_SURFACE, 0xf0)
        .unwrap();
    assert_eq!(display.count(), 2);
    assert_eq!(dev.channel(2).unwrap().d3d.clear_surface, 0xf0);

    // Rejected commands never reach the display.
    assert!(dev
        .execute_d3d_command(32, kelvin::method::CLEAR_SURFACE, 0xf0)
        .is_err());
    assert_eq!(display.count(), 2);
}

#[test]
fn default_kick_binds_semaphore_object() {
    let (mut dev, _, _) = new_test_device();
    dev.mmio_write(mmio::PFIFO_CACHE1_DMA_INSTANCE, 4, 0x0001_2000);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUSH1, 4, push1::ENABLE | 9);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUT, 4, 0x80);

    assert_eq!(dev.channel(9).unwrap().d3d.semaphore_obj, 0x0001_2000);
    assert_eq!(dev.channel(8).unwrap().d3d.semaphore_obj, 0);
    assert_eq!(dev.mmio_read(mmio::PFIFO_INTR_0, 4), 0);
}

#[test]
fn queued_kick_runs_semaphore_sequence() {
    let (mut dev, _, _) = new_test_device();
    let queue = QueuedCommandFetch::new();
    dev.set_command_fetch(Box::new(queue.clone()));

    for (method, param) in [
        (kelvin::method::SEMAPHORE_OBJECT, 0x2_0000),
        (kelvin::method::SEMAPHORE_OFFSET, 0x40),
        (kelvin::method::SEMAPHORE_ACQUIRE, 0xcafe_0001),
    ] {
        queue.push(Command::new(4, 0, EngineClass::Kelvin, method, param));
    }
    assert_eq!(dev.vram().read_u32(0x2_0040).unwrap(), 0);

    // Writing PUT without the pusher enabled leaves the queue alone.
    dev.mmio_write(mmio::PFIFO_CACHE1_PUT, 4, 0x0c);
    assert_eq!(queue.len(), 3);

    dev.mmio_write(mmio::PFIFO_CACHE1_PUSH1, 4, push1::ENABLE | 4);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUT, 4, 0x0c);
    assert!(queue.is_empty());
    assert_eq!(dev.vram().read_u32(0x2_0040).unwrap(), 0xcafe_0001);
}

#[test]
fn rejected_kick_command_latches_cache_error() {
    let (mut dev, irq, _) = new_test_device();
    let queue = QueuedCommandFetch::new();
    dev.set_command_fetch(Box::new(queue.clone()));
    dev.mmio_write(mmio::PMC_INTR_EN_0, 4, McIntr::FIFO.bits());
    dev.mmio_write(mmio::PFIFO_INTR_EN_0, 4, fifo_intr_bits::CACHE_ERROR);

    queue.push(Command::new(0, 0, EngineClass::Kelvin, 0x0abc, 1));
    queue.push(Command::new(0, 0, EngineClass::Kelvin, kelvin::method::SURFACE_PITCH, 0x100));
    dev.mmio_write(mmio::PFIFO_CACHE1_PUSH1, 4, push1::ENABLE);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUT, 4, 0x8);

    // The bad method is reported; the good one still runs.
    assert_eq!(
        dev.mmio_read(mmio::PFIFO_INTR_0, 4),
        fifo_intr_bits::CACHE_ERROR
    );
    assert_eq!(dev.channel(0).unwrap().d3d.surface_pitch, 0x100);
    assert!(dev.irq_level());
    assert_eq!(irq.last(), Some(true));

    dev.mmio_write(mmio::PFIFO_INTR_0, 4, fifo_intr_bits::CACHE_ERROR);
    assert!(!dev.irq_level());
}

#[test]
fn null_fetch_kick_is_inert() {
    let (mut dev, _, _) = new_test_device();
    dev.set_command_fetch(Box::new(NullCommandFetch::new()));
    let before = dev.channels().clone();
    dev.mmio_write(mmio::PFIFO_CACHE1_DMA_INSTANCE, 4, 0x1000);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUSH1, 4, push1::ENABLE | 1);
    dev.mmio_write(mmio::PFIFO_CACHE1_PUT, 4, 0x4);
    assert_eq!(dev.channels(), &before);
    assert_eq!(dev.regs().cache1_put, 0x4);
}

proptest! {
    #[test]
    fn semaphore_roundtrip(
        chid in 0u32..32,
        object in 0u32..0x8_0000,
        offset in 0u32..0x7_fffc,
        value in any::<u32>(),
    ) {
        let (mut dev, _, _) = new_test_device();
        dev.execute_d3d_command(chid, kelvin::method::SEMAPHORE_OBJECT, object).unwrap();
        dev.execute_d3d_command(chid, kelvin::method::SEMAPHORE_OFFSET, offset).unwrap();
        dev.execute_d3d_command(chid, kelvin::method::SEMAPHORE_ACQUIRE, value).unwrap();
        let addr = u64::from(object) + u64::from(offset);
        prop_assert_eq!(dev.vram().read_u32(addr).unwrap(), value);
    }

    #[test]
    fn out_of_range_channels_rejected(chid in 32u32.., method in any::<u32>(), param in any::<u32>()) {
        let (mut dev, _, _) = new_test_device();
        let before = dev.channels().clone();
        prop_assert_eq!(
            dev.execute_d3d_command(chid, method, param),
            Err(DispatchError::InvalidChannel(chid))
        );
        prop_assert_eq!(dev.channels(), &before);
    }
}
