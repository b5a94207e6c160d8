//! The fixed HIERARCHY block of every exported file.

/// Joint tree, rest offsets and channel layout of the rig. Offsets are in
/// BVH units (inches). Joint order matches `skeleton::Skeleton`.
pub static HIERARCHY: &str = concat!(
    "HIERARCHY\n",
    "ROOT hip\n",
    "{\n",
    "\tOFFSET 0.000000 0.000000 0.000000\n",
    "\tCHANNELS 6 Xposition Yposition Zposition Xrotation Zrotation Yrotation \n",
    "\tJOINT abdomen\n",
    "\t{\n",
    "\t\tOFFSET 0.000000 3.422050 0.000000\n",
    "\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\tJOINT chest\n",
    "\t\t{\n",
    "\t\t\tOFFSET 0.000000 8.486693 -0.684411\n",
    "\t\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\t\tJOINT neck\n",
    "\t\t\t{\n",
    "\t\t\t\tOFFSET 0.000000 10.266162 -0.273764\n",
    "\t\t\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\t\t\tJOINT head\n",
    "\t\t\t\t{\n",
    "\t\t\t\t\tOFFSET 0.000000 3.148285 0.000000\n",
    "\t\t\t\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\t\t\t\tEnd Site\n",
    "\t\t\t\t\t{\n",
    "\t\t\t\t\t\tOFFSET 0.000000 3.148289 0.000000\n",
    "\t\t\t\t\t}\n",
    "\t\t\t\t}\n",
    "\t\t\t}\n",
    "\t\t\tJOINT lCollar\n",
    "\t\t\t{\n",
    "\t\t\t\tOFFSET 3.422053 6.707223 -0.821293\n",
    "\t\t\t\tCHANNELS 3 Yrotation Zrotation Xrotation \n",
    "\t\t\t\tJOINT lShldr\n",
    "\t\t\t\t{\n",
    "\t\t\t\t\tOFFSET 3.285171 0.000000 0.000000\n",
    "\t\t\t\t\tCHANNELS 3 Zrotation Yrotation Xrotation \n",
    "\t\t\t\t\tJOINT lForeArm\n",
    "\t\t\t\t\t{\n",
    "\t\t\t\t\t\tOFFSET 10.129278 0.000000 0.000000\n",
    "\t\t\t\t\t\tCHANNELS 3 Yrotation Zrotation Xrotation \n",
    "\t\t\t\t\t\tJOINT lHand\n",
    "\t\t\t\t\t\t{\n",
    "\t\t\t\t\t\t\tOFFSET 8.486692 0.000000 0.000000\n",
    "\t\t\t\t\t\t\tCHANNELS 3 Zrotation Yrotation Xrotation \n",
    "\t\t\t\t\t\t\tEnd Site\n",
    "\t\t\t\t\t\t\t{\n",
    "\t\t\t\t\t\t\t\tOFFSET 4.106464 0.000000 0.000000\n",
    "\t\t\t\t\t\t\t}\n",
    "\t\t\t\t\t\t}\n",
    "\t\t\t\t\t}\n",
    "\t\t\t\t}\n",
    "\t\t\t}\n",
    "\t\t\tJOINT rCollar\n",
    "\t\t\t{\n",
    "\t\t\t\tOFFSET -3.558935 6.707223 -0.821293\n",
    "\t\t\t\tCHANNELS 3 Yrotation Zrotation Xrotation \n",
    "\t\t\t\tJOINT rShldr\n",
    "\t\t\t\t{\n",
    "\t\t\t\t\tOFFSET -3.148289 0.000000 0.000000\n",
    "\t\t\t\t\tCHANNELS 3 Zrotation Yrotation Xrotation \n",
    "\t\t\t\t\tJOINT rForeArm\n",
    "\t\t\t\t\t{\n",
    "\t\t\t\t\t\tOFFSET -10.266159 0.000000 0.000000\n",
    "\t\t\t\t\t\tCHANNELS 3 Yrotation Zrotation Xrotation \n",
    "\t\t\t\t\t\tJOINT rHand\n",
    "\t\t\t\t\t\t{\n",
    "\t\t\t\t\t\t\tOFFSET -8.349810 0.000000 0.000000\n",
    "\t\t\t\t\t\t\tCHANNELS 3 Zrotation Yrotation Xrotation \n",
    "\t\t\t\t\t\t\tEnd Site\n",
    "\t\t\t\t\t\t\t{\n",
    "\t\t\t\t\t\t\t\tOFFSET -4.106464 0.000000 0.000000\n",
    "\t\t\t\t\t\t\t}\n",
    "\t\t\t\t\t\t}\n",
    "\t\t\t\t\t}\n",
    "\t\t\t\t}\n",
    "\t\t\t}\n",
    "\t\t}\n",
    "\t}\n",
    "\tJOINT lThigh\n",
    "\t{\n",
    "\t\tOFFSET 5.338403 -1.642589 1.368821\n",
    "\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\tJOINT lShin\n",
    "\t\t{\n",
    "\t\t\tOFFSET -2.053232 -20.121670 0.000000\n",
    "\t\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\t\tJOINT lFoot\n",
    "\t\t\t{\n",
    "\t\t\t\tOFFSET 0.000000 -19.300380 -1.231939\n",
    "\t\t\t\tCHANNELS 3 Xrotation Yrotation Zrotation \n",
    "\t\t\t\tEnd Site\n",
    "\t\t\t\t{\n",
    "\t\t\t\t\tOFFSET 0.000000 -2.463878 4.653993\n",
    "\t\t\t\t}\n",
    "\t\t\t}\n",
    "\t\t}\n",
    "\t}\n",
    "\tJOINT rThigh\n",
    "\t{\n",
    "\t\tOFFSET -5.338403 -1.642589 1.368821\n",
    "\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\tJOINT rShin\n",
    "\t\t{\n",
    "\t\t\tOFFSET 2.053232 -20.121670 0.000000\n",
    "\t\t\tCHANNELS 3 Xrotation Zrotation Yrotation \n",
    "\t\t\tJOINT rFoot\n",
    "\t\t\t{\n",
    "\t\t\t\tOFFSET 0.000000 -19.300380 -1.231939\n",
    "\t\t\t\tCHANNELS 3 Xrotation Yrotation Zrotation \n",
    "\t\t\t\tEnd Site\n",
    "\t\t\t\t{\n",
    "\t\t\t\t\tOFFSET 0.000000 -2.463878 4.653993\n",
    "\t\t\t\t}\n",
    "\t\t\t}\n",
    "\t\t}\n",
    "\t}\n",
    "}\n",
);
