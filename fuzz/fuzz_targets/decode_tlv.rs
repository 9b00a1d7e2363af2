#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::{Ber, Decoder, Der, Tlv, encode_chain};

fuzz_target!(|data: &[u8]| {
    let ber = Decoder::<Ber>::new().decode_slice(data);
    let der = Decoder::<Der>::new().decode_slice(data);

    // Everything DER accepts, BER accepts the same way.
    if let Ok(der) = der.as_ref() {
        assert_eq!(ber.as_ref().ok(), Some(der));

        // DER data re-encodes to itself.
        assert_eq!(encode_chain(der).unwrap(), data);
    }

    // BER data re-encodes to something DER accepts as the same tree.
    if let Ok(ber) = ber {
        let encoded = encode_chain(&ber).unwrap();
        assert_eq!(
            encoded.len(),
            ber.iter().map(Tlv::full_length).sum::<usize>()
        );
        assert_eq!(Decoder::<Der>::new().decode_slice(&encoded).unwrap(), ber);
    }
});
