//! Contact classification
//!
//! Turns the contacts touching an object's bodies into `ContactFlags`.
//! A contact is ground when its normal points up enough; it is a slope when
//! the surface is tilted past `slope_min_deg`.

use macroquad::math::vec2;

use crate::config::ContactSettings;
use crate::physics::Contact;
use super::object::ContactFlags;

pub fn classify(contacts: &[Contact], settings: &ContactSettings) -> ContactFlags {
    let up = vec2(0.0, -1.0);
    let slope_cos = settings.slope_min_deg.to_radians().cos();
    let mut flags = ContactFlags::default();

    for contact in contacts {
        let up_dot = contact.normal.dot(up);
        if up_dot < settings.ground_normal_min {
            continue;
        }
        flags.on_ground = true;
        if up_dot < slope_cos {
            flags.on_slope = true;
        }
        if contact.other_dynamic {
            flags.on_dynamic_body = true;
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::Vec2;

    fn contact(degrees: f32, other_dynamic: bool) -> Contact {
        // Normal tilted `degrees` away from straight up
        let angle = degrees.to_radians();
        Contact {
            normal: vec2(angle.sin(), -angle.cos()),
            other_dynamic,
        }
    }

    #[test]
    fn test_no_contacts_is_airborne() {
        assert_eq!(classify(&[], &ContactSettings::default()), ContactFlags::default());
    }

    #[test]
    fn test_flat_ground() {
        let flags = classify(&[contact(0.0, false)], &ContactSettings::default());
        assert!(flags.on_ground);
        assert!(!flags.on_slope);
        assert!(!flags.on_dynamic_body);
    }

    #[test]
    fn test_slope() {
        let flags = classify(&[contact(25.0, false)], &ContactSettings::default());
        assert!(flags.on_ground && flags.on_slope);
    }

    #[test]
    fn test_walls_and_ceilings_are_ignored() {
        let wall = Contact { normal: vec2(1.0, 0.0), other_dynamic: false };
        let ceiling = Contact { normal: vec2(0.0, 1.0), other_dynamic: true };
        assert_eq!(classify(&[wall, ceiling], &ContactSettings::default()), ContactFlags::default());
    }

    #[test]
    fn test_standing_on_a_box() {
        let flags = classify(&[contact(0.0, true), Contact { normal: Vec2::X, other_dynamic: false }], &ContactSettings::default());
        assert!(flags.on_ground);
        assert!(flags.on_dynamic_body);
    }
}
